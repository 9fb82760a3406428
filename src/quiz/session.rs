//! The quiz session state machine.
//!
//! ```text
//! InProgress(i, revealed=false) --select/reveal--> InProgress(i, revealed=true)
//! InProgress(i, revealed=true)  --advance-->       InProgress(i+1, false) | Completed
//! InProgress(..)                --expire-->        TimedOut
//! TimedOut                      --restart-->       InProgress(0, false)
//! ```
//!
//! All mutation goes through the methods below. Timer and reveal-delay
//! wake-ups arrive as [`SessionEvent`]s and are applied with
//! [`QuizSession::handle`]; events from a cancelled run are ignored.

use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{HistoryEntry, Question, QuestionResult};

use super::error::SessionError;
use super::recorder::ResultRecorder;
use super::schedule::{EventKind, Scheduler, SessionEvent, TaskGuard};
use super::shuffle::AnswerShuffler;
use super::timer::{Countdown, TickOutcome};

pub const DEFAULT_TIME_LIMIT_SECS: u32 = 300;
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(1500);

/// Macro-state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Completed,
    TimedOut,
}

/// Observable state of one quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub id: Uuid,
    pub total_questions: usize,
    pub current_index: usize,
    pub selected_answer: Option<String>,
    pub revealed: bool,
    /// Number of correct entries in `results`.
    pub score: usize,
    /// One entry per question the session has advanced past.
    pub results: Vec<QuestionResult>,
    pub time_remaining_secs: u32,
    pub phase: Phase,
}

/// Per-session knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub time_limit_secs: u32,
    pub reveal_delay: Duration,
    /// Title given to the history entry on completion.
    pub title: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            reveal_delay: DEFAULT_REVEAL_DELAY,
            title: "Quiz 1".to_string(),
        }
    }
}

/// What changed as a result of a command or event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    /// The countdown moved; seconds remaining.
    Ticked(u32),
    /// Now showing the question at this index.
    NextQuestion(usize),
    /// All questions answered. The entry goes to the history store.
    Completed(HistoryEntry),
    TimedOut,
}

struct PendingAdvance {
    generation: u64,
    _task: Option<TaskGuard>,
}

pub struct QuizSession {
    state: SessionState,
    questions: Vec<Question>,
    shuffler: AnswerShuffler,
    timer: Countdown,
    time_limit_secs: u32,
    reveal_delay: Duration,
    revealed_result: Option<QuestionResult>,
    pending_advance: Option<PendingAdvance>,
    advance_generation: u64,
    recorder: ResultRecorder,
    scheduler: Scheduler,
}

impl QuizSession {
    /// Start a session over `questions`; the countdown starts immediately.
    pub fn new(
        questions: Vec<Question>,
        settings: SessionSettings,
        scheduler: Scheduler,
    ) -> Result<Self, SessionError> {
        Self::with_shuffler(questions, settings, scheduler, AnswerShuffler::new())
    }

    pub fn with_shuffler(
        questions: Vec<Question>,
        settings: SessionSettings,
        scheduler: Scheduler,
        shuffler: AnswerShuffler,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionSet);
        }

        let id = Uuid::new_v4();
        let mut session = Self {
            state: SessionState {
                id,
                total_questions: questions.len(),
                current_index: 0,
                selected_answer: None,
                revealed: false,
                score: 0,
                results: Vec::with_capacity(questions.len()),
                time_remaining_secs: settings.time_limit_secs,
                phase: Phase::InProgress,
            },
            questions,
            shuffler,
            timer: Countdown::new(),
            time_limit_secs: settings.time_limit_secs,
            reveal_delay: settings.reveal_delay,
            revealed_result: None,
            pending_advance: None,
            advance_generation: 0,
            recorder: ResultRecorder::new(id, settings.title),
            scheduler,
        };
        session.shuffler.reset();
        session.enter_question();
        session.timer.start(session.time_limit_secs, id, &session.scheduler);
        info!(
            session = %id,
            questions = session.state.total_questions,
            time_limit_secs = session.time_limit_secs,
            "quiz session started"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.state.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn title(&self) -> &str {
        self.recorder.title()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.timer
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.state.current_index]
    }

    /// Display order of the current question's answers.
    pub fn answers(&self) -> &[String] {
        self.shuffler.current().unwrap_or_default()
    }

    /// Result of the current question once revealed, until the session advances.
    pub fn revealed_result(&self) -> Option<&QuestionResult> {
        self.revealed_result.as_ref()
    }

    pub fn is_advance_pending(&self) -> bool {
        self.pending_advance.is_some()
    }

    /// Choose an answer for the current question.
    ///
    /// Ignored once the answer is revealed. Answers outside the current
    /// answer set are rejected and leave the selection untouched.
    pub fn select_answer(&mut self, answer: &str) -> Result<(), SessionError> {
        self.ensure_in_progress("select an answer")?;
        if self.state.revealed {
            debug!(session = %self.state.id, "selection locked after reveal");
            return Ok(());
        }
        if !self.current_question().has_answer(answer) {
            return Err(SessionError::UnknownAnswer(answer.to_string()));
        }
        self.state.selected_answer = Some(answer.to_string());
        Ok(())
    }

    /// Lock in the selected answer and schedule the advance.
    pub fn reveal(&mut self) -> Result<&QuestionResult, SessionError> {
        self.ensure_in_progress("reveal")?;
        if self.state.revealed {
            return Err(SessionError::invalid("reveal", "answer already revealed"));
        }
        let Some(selected) = self.state.selected_answer.clone() else {
            return Err(SessionError::invalid("reveal", "no answer selected"));
        };

        let question = self.current_question();
        let result = QuestionResult {
            question_text: question.text.clone(),
            is_correct: selected == question.correct_answer,
            correct_answer: question.correct_answer.clone(),
            selected_answer: selected,
            all_answers: self.answers().to_vec(),
        };
        self.state.revealed = true;

        self.advance_generation += 1;
        let generation = self.advance_generation;
        let task = self.scheduler.after(
            self.state.id,
            self.reveal_delay,
            EventKind::RevealElapsed { generation },
        );
        self.pending_advance = Some(PendingAdvance {
            generation,
            _task: task,
        });

        debug!(
            session = %self.state.id,
            index = self.state.current_index,
            correct = result.is_correct,
            "answer revealed"
        );
        Ok(self.revealed_result.insert(result))
    }

    /// Move past the revealed question, completing the session after the last one.
    pub fn advance(&mut self) -> Result<Transition, SessionError> {
        self.ensure_in_progress("advance")?;
        let Some(result) = self.revealed_result.take() else {
            return Err(SessionError::invalid("advance", "current answer not revealed"));
        };
        self.pending_advance = None;

        if result.is_correct {
            self.state.score += 1;
        }
        self.state.results.push(result);

        if self.state.current_index + 1 < self.state.total_questions {
            self.state.current_index += 1;
            self.state.selected_answer = None;
            self.state.revealed = false;
            self.enter_question();
            debug!(session = %self.state.id, index = self.state.current_index, "next question");
            return Ok(Transition::NextQuestion(self.state.current_index));
        }

        self.state.phase = Phase::Completed;
        self.timer.cancel();
        info!(
            session = %self.state.id,
            score = self.state.score,
            total = self.state.total_questions,
            "quiz session completed"
        );
        let entry = self.recorder.record(&self.state)?;
        Ok(Transition::Completed(entry))
    }

    /// End the attempt because time ran out.
    ///
    /// A revealed but not yet advanced question is discarded with its result.
    pub fn expire(&mut self) -> Transition {
        if self.state.phase != Phase::InProgress {
            return Transition::Unchanged;
        }
        self.pending_advance = None;
        self.revealed_result = None;
        self.timer.cancel();
        self.state.phase = Phase::TimedOut;
        info!(
            session = %self.state.id,
            answered = self.state.results.len(),
            "quiz session timed out"
        );
        Transition::TimedOut
    }

    /// Start the same questions over after a timeout.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.state.phase != Phase::TimedOut {
            return Err(SessionError::invalid("restart", "session has not timed out"));
        }
        self.pending_advance = None;
        self.revealed_result = None;

        self.state.current_index = 0;
        self.state.selected_answer = None;
        self.state.revealed = false;
        self.state.score = 0;
        self.state.results.clear();
        self.state.time_remaining_secs = self.time_limit_secs;
        self.state.phase = Phase::InProgress;

        self.shuffler.reset();
        self.enter_question();
        self.timer.start(self.time_limit_secs, self.state.id, &self.scheduler);
        info!(session = %self.state.id, "quiz session restarted");
        Ok(())
    }

    /// Abandon the attempt without recording it.
    pub fn exit_early(mut self) -> Result<(), SessionError> {
        self.ensure_in_progress("exit")?;
        self.pending_advance = None;
        self.timer.cancel();
        info!(
            session = %self.state.id,
            answered = self.state.results.len(),
            "quiz session abandoned"
        );
        Ok(())
    }

    /// Apply a wake-up from the scheduler.
    pub fn handle(&mut self, event: SessionEvent) -> Transition {
        if event.session != self.state.id {
            debug!(session = %self.state.id, stale = %event.session, "event for another session");
            return Transition::Unchanged;
        }

        match event.kind {
            EventKind::Tick { generation } => self.apply_tick(generation),
            EventKind::RevealElapsed { generation } => {
                let due = self
                    .pending_advance
                    .as_ref()
                    .is_some_and(|pending| pending.generation == generation);
                if !due || self.state.phase != Phase::InProgress {
                    debug!(session = %self.state.id, generation, "stale reveal delay");
                    return Transition::Unchanged;
                }
                if self.timer.is_due() {
                    debug!(session = %self.state.id, "countdown ran out with the advance pending");
                    self.state.time_remaining_secs = 0;
                    return self.expire();
                }
                match self.advance() {
                    Ok(transition) => transition,
                    Err(e) => {
                        warn!(session = %self.state.id, error = %e, "scheduled advance failed");
                        Transition::Unchanged
                    }
                }
            }
        }
    }

    /// Apply one second of the current countdown run.
    pub fn tick(&mut self) -> Transition {
        self.apply_tick(self.timer.generation())
    }

    fn apply_tick(&mut self, generation: u64) -> Transition {
        if self.state.phase != Phase::InProgress {
            return Transition::Unchanged;
        }
        match self.timer.tick(generation) {
            TickOutcome::Stale => Transition::Unchanged,
            TickOutcome::Remaining(secs) => {
                self.state.time_remaining_secs = secs;
                Transition::Ticked(secs)
            }
            TickOutcome::Expired => {
                self.state.time_remaining_secs = 0;
                self.expire()
            }
        }
    }

    fn enter_question(&mut self) {
        let index = self.state.current_index;
        self.shuffler.shuffle(index, &self.questions[index]);
    }

    fn ensure_in_progress(&self, operation: &'static str) -> Result<(), SessionError> {
        match self.state.phase {
            Phase::InProgress => Ok(()),
            Phase::Completed => Err(SessionError::invalid(operation, "session is completed")),
            Phase::TimedOut => Err(SessionError::invalid(operation, "session timed out")),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::time::{self, Instant};

    use super::*;
    use crate::quiz::schedule::EventReceiver;
    use crate::quiz::timer::CountdownState;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                Question::new(
                    format!("Question {i}"),
                    format!("right {i}"),
                    [format!("wrong {i}a"), format!("wrong {i}b"), format!("wrong {i}c")],
                )
            })
            .collect()
    }

    fn manual_session(n: usize) -> QuizSession {
        QuizSession::new(questions(n), SessionSettings::default(), Scheduler::manual()).unwrap()
    }

    fn correct(session: &QuizSession) -> String {
        session.current_question().correct_answer.clone()
    }

    fn wrong(session: &QuizSession) -> String {
        session.current_question().incorrect_answers[0].clone()
    }

    fn answer(session: &mut QuizSession, choice: String) -> Transition {
        session.select_answer(&choice).unwrap();
        session.reveal().unwrap();
        session.advance().unwrap()
    }

    fn assert_score_matches_results(session: &QuizSession) {
        let state = session.state();
        let correct = state.results.iter().filter(|r| r.is_correct).count();
        assert_eq!(state.score, correct);
    }

    #[test]
    fn test_initial_state() {
        let session = manual_session(3);
        let state = session.state();
        assert_eq!(state.phase, Phase::InProgress);
        assert_eq!(state.current_index, 0);
        assert_eq!(state.selected_answer, None);
        assert!(!state.revealed);
        assert_eq!(state.score, 0);
        assert!(state.results.is_empty());
        assert_eq!(state.time_remaining_secs, DEFAULT_TIME_LIMIT_SECS);
        assert_eq!(session.countdown().state(), CountdownState::Running);
        assert_eq!(session.answers().len(), 4);
    }

    #[test]
    fn test_empty_question_set_is_rejected() {
        let result = QuizSession::new(Vec::new(), SessionSettings::default(), Scheduler::manual());
        assert!(matches!(result, Err(SessionError::EmptyQuestionSet)));
    }

    #[test]
    fn test_all_correct_completes_with_one_entry() {
        let mut session = manual_session(5);
        let mut entries = Vec::new();

        for i in 0..5 {
            let choice = correct(&session);
            match answer(&mut session, choice) {
                Transition::NextQuestion(next) => assert_eq!(next, i + 1),
                Transition::Completed(entry) => entries.push(entry),
                other => panic!("unexpected transition {other:?}"),
            }
            assert_score_matches_results(&session);
        }

        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.state().score, 5);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].results.len(), 5);
        assert_eq!(entries[0].total_questions, 5);
        assert_eq!(entries[0].score, 5);
        assert_eq!(entries[0].title, "Quiz 1");
        assert_eq!(session.countdown().state(), CountdownState::Cancelled);
    }

    #[test]
    fn test_mixed_answers_score() {
        let mut session = manual_session(4);
        for i in 0..4 {
            let choice = if i % 2 == 0 { correct(&session) } else { wrong(&session) };
            answer(&mut session, choice);
            assert_score_matches_results(&session);
        }
        assert_eq!(session.state().score, 2);
        assert!(!session.state().results[1].is_correct);
        assert_eq!(session.state().results[1].correct_answer, "right 1");
    }

    #[test]
    fn test_result_uses_displayed_order() {
        let mut session = manual_session(2);
        let shown = session.answers().to_vec();
        let choice = correct(&session);
        session.select_answer(&choice).unwrap();
        let result = session.reveal().unwrap();
        assert_eq!(result.all_answers, shown);
        // Order does not move while the result is on screen.
        assert_eq!(session.answers(), shown.as_slice());
    }

    #[test]
    fn test_selection_can_change_before_reveal() {
        let mut session = manual_session(1);
        let first = wrong(&session);
        let second = correct(&session);
        session.select_answer(&first).unwrap();
        session.select_answer(&second).unwrap();
        assert_eq!(session.state().selected_answer.as_deref(), Some(second.as_str()));
    }

    #[test]
    fn test_selection_locked_after_reveal() {
        let mut session = manual_session(2);
        let choice = wrong(&session);
        session.select_answer(&choice).unwrap();
        session.reveal().unwrap();

        let before = session.state().clone();
        let other = correct(&session);
        assert_eq!(session.select_answer(&other), Ok(()));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_unknown_answer_rejected() {
        let mut session = manual_session(1);
        let err = session.select_answer("X").unwrap_err();
        assert_eq!(err, SessionError::UnknownAnswer("X".to_string()));
        assert_eq!(session.state().selected_answer, None);

        // An answer to a later question is not in the current set either.
        let later = "right 1";
        let mut two = manual_session(2);
        assert!(two.select_answer(later).is_err());
    }

    #[test]
    fn test_reveal_requires_selection() {
        let mut session = manual_session(1);
        assert!(matches!(
            session.reveal(),
            Err(SessionError::InvalidState { operation: "reveal", .. })
        ));
        assert!(!session.state().revealed);
    }

    #[test]
    fn test_reveal_twice_rejected() {
        let mut session = manual_session(2);
        let choice = correct(&session);
        session.select_answer(&choice).unwrap();
        session.reveal().unwrap();
        assert!(session.reveal().is_err());
    }

    #[test]
    fn test_reveal_defers_result_until_advance() {
        let mut session = manual_session(3);
        let choice = correct(&session);
        session.select_answer(&choice).unwrap();
        session.reveal().unwrap();

        assert!(session.state().revealed);
        assert!(session.revealed_result().is_some_and(|r| r.is_correct));
        assert!(session.is_advance_pending());
        assert_eq!(session.state().results.len(), session.state().current_index);
        assert_score_matches_results(&session);

        session.advance().unwrap();
        assert_eq!(session.state().results.len(), 1);
        assert_eq!(session.state().score, 1);
        assert_eq!(session.state().selected_answer, None);
        assert!(!session.state().revealed);
        assert!(!session.is_advance_pending());
    }

    #[test]
    fn test_advance_requires_reveal() {
        let mut session = manual_session(2);
        assert!(session.advance().is_err());
        let choice = correct(&session);
        session.select_answer(&choice).unwrap();
        assert!(session.advance().is_err());
        assert_eq!(session.state().current_index, 0);
    }

    #[test]
    fn test_commands_rejected_after_completion() {
        let mut session = manual_session(1);
        let choice = correct(&session);
        answer(&mut session, choice.clone());

        assert!(session.select_answer(&choice).is_err());
        assert!(session.reveal().is_err());
        assert!(session.advance().is_err());
        assert!(session.restart().is_err());
        assert_eq!(session.expire(), Transition::Unchanged);
        assert_eq!(session.phase(), Phase::Completed);
    }

    #[test]
    fn test_timeout_after_two_answers_records_nothing() {
        let mut session = manual_session(5);
        for _ in 0..2 {
            let choice = correct(&session);
            answer(&mut session, choice);
        }

        let mut last = Transition::Unchanged;
        for _ in 0..DEFAULT_TIME_LIMIT_SECS {
            last = session.tick();
        }

        assert_eq!(last, Transition::TimedOut);
        assert_eq!(session.phase(), Phase::TimedOut);
        assert_eq!(session.state().time_remaining_secs, 0);
        assert_eq!(session.state().results.len(), 2);
        assert_eq!(session.tick(), Transition::Unchanged);
        assert!(session.advance().is_err());
    }

    #[test]
    fn test_expire_discards_in_flight_question() {
        let mut session = manual_session(3);
        let choice = correct(&session);
        answer(&mut session, choice);

        let choice = correct(&session);
        session.select_answer(&choice).unwrap();
        session.reveal().unwrap();
        let generation = session.pending_advance.as_ref().unwrap().generation;

        assert_eq!(session.expire(), Transition::TimedOut);
        assert_eq!(session.state().results.len(), 1);
        assert!(session.revealed_result().is_none());
        assert_score_matches_results(&session);

        // The reveal delay firing in the same instant loses.
        let late = SessionEvent {
            session: session.id(),
            kind: EventKind::RevealElapsed { generation },
        };
        assert_eq!(session.handle(late), Transition::Unchanged);
        assert_eq!(session.state().results.len(), 1);
        assert_eq!(session.phase(), Phase::TimedOut);
    }

    #[test]
    fn test_expire_before_any_answer() {
        let mut session = manual_session(2);
        assert_eq!(session.expire(), Transition::TimedOut);
        assert!(session.state().results.is_empty());
        assert_eq!(session.expire(), Transition::Unchanged);
    }

    #[test]
    fn test_restart_from_timeout() {
        let settings = SessionSettings {
            time_limit_secs: 10,
            ..SessionSettings::default()
        };
        let mut session = QuizSession::new(questions(3), settings, Scheduler::manual()).unwrap();
        let choice = correct(&session);
        answer(&mut session, choice);
        let old_generation = session.countdown().generation();
        session.expire();

        session.restart().unwrap();
        let state = session.state();
        assert_eq!(state.phase, Phase::InProgress);
        assert_eq!(state.current_index, 0);
        assert_eq!(state.score, 0);
        assert!(state.results.is_empty());
        assert_eq!(state.selected_answer, None);
        assert!(!state.revealed);
        assert_eq!(state.time_remaining_secs, 10);
        assert_eq!(session.countdown().state(), CountdownState::Running);
        assert_eq!(session.countdown().remaining_secs(), 10);

        // A tick from the run before the timeout is ignored.
        let stale = SessionEvent {
            session: session.id(),
            kind: EventKind::Tick {
                generation: old_generation,
            },
        };
        assert_eq!(session.handle(stale), Transition::Unchanged);
        assert_eq!(session.tick(), Transition::Ticked(9));
    }

    #[test]
    fn test_restart_only_from_timeout() {
        let mut session = manual_session(2);
        assert!(matches!(
            session.restart(),
            Err(SessionError::InvalidState { operation: "restart", .. })
        ));
    }

    #[test]
    fn test_exit_early() {
        let session = manual_session(2);
        assert_eq!(session.exit_early(), Ok(()));

        let mut timed_out = manual_session(2);
        timed_out.expire();
        assert!(timed_out.exit_early().is_err());
    }

    #[test]
    fn test_events_for_other_sessions_ignored() {
        let mut session = manual_session(2);
        let foreign = SessionEvent {
            session: Uuid::new_v4(),
            kind: EventKind::Tick {
                generation: session.countdown().generation(),
            },
        };
        assert_eq!(session.handle(foreign), Transition::Unchanged);
        assert_eq!(session.state().time_remaining_secs, DEFAULT_TIME_LIMIT_SECS);
    }

    #[test]
    fn test_direct_advance_invalidates_scheduled_one() {
        let mut session = manual_session(3);
        let choice = correct(&session);
        session.select_answer(&choice).unwrap();
        session.reveal().unwrap();
        let generation = session.pending_advance.as_ref().unwrap().generation;
        session.advance().unwrap();

        let late = SessionEvent {
            session: session.id(),
            kind: EventKind::RevealElapsed { generation },
        };
        assert_eq!(session.handle(late), Transition::Unchanged);
        assert_eq!(session.state().current_index, 1);
    }

    async fn drive(session: &mut QuizSession, rx: &mut EventReceiver) -> Transition {
        loop {
            let event = rx.recv().await.expect("scheduler channel closed");
            match session.handle(event) {
                Transition::Unchanged | Transition::Ticked(_) => continue,
                other => return other,
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_advances_after_delay() {
        let (scheduler, mut rx) = Scheduler::channel();
        let mut session = QuizSession::new(questions(2), SessionSettings::default(), scheduler).unwrap();
        let start = Instant::now();

        let choice = correct(&session);
        session.select_answer(&choice).unwrap();
        session.reveal().unwrap();

        assert_eq!(drive(&mut session, &mut rx).await, Transition::NextQuestion(1));
        assert_eq!(start.elapsed(), DEFAULT_REVEAL_DELAY);
        assert_eq!(session.state().time_remaining_secs, DEFAULT_TIME_LIMIT_SECS - 1);

        let choice = correct(&session);
        session.select_answer(&choice).unwrap();
        session.reveal().unwrap();
        let Transition::Completed(entry) = drive(&mut session, &mut rx).await else {
            panic!("session did not complete");
        };
        assert_eq!(entry.score, 2);
        assert_eq!(entry.results.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_times_out_session() {
        let (scheduler, mut rx) = Scheduler::channel();
        let settings = SessionSettings {
            time_limit_secs: 5,
            ..SessionSettings::default()
        };
        let mut session = QuizSession::new(questions(5), settings, scheduler).unwrap();
        let start = Instant::now();

        for _ in 0..2 {
            let choice = correct(&session);
            session.select_answer(&choice).unwrap();
            session.reveal().unwrap();
            assert!(matches!(drive(&mut session, &mut rx).await, Transition::NextQuestion(_)));
        }

        assert_eq!(drive(&mut session, &mut rx).await, Transition::TimedOut);
        assert_eq!(start.elapsed(), Duration::from_secs(5));
        assert_eq!(session.state().results.len(), 2);

        // Nothing further arrives for the timed out session.
        time::sleep(Duration::from_secs(30)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_beats_pending_reveal() {
        let (scheduler, mut rx) = Scheduler::channel();
        let settings = SessionSettings {
            time_limit_secs: 1,
            ..SessionSettings::default()
        };
        let mut session = QuizSession::new(questions(2), settings, scheduler).unwrap();

        let choice = correct(&session);
        session.select_answer(&choice).unwrap();
        session.reveal().unwrap();

        // The countdown fires at 1s, before the 1.5s reveal delay.
        assert_eq!(drive(&mut session, &mut rx).await, Transition::TimedOut);
        assert!(session.state().results.is_empty());
        assert_eq!(session.state().score, 0);

        time::sleep(Duration::from_secs(5)).await;
        while let Ok(event) = rx.try_recv() {
            assert_eq!(session.handle(event), Transition::Unchanged);
        }
        assert_eq!(session.phase(), Phase::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_wins_when_reveal_delay_ends_at_zero() {
        let (scheduler, mut rx) = Scheduler::channel();
        let settings = SessionSettings {
            time_limit_secs: 2,
            ..SessionSettings::default()
        };
        let mut session = QuizSession::new(questions(1), settings, scheduler).unwrap();

        time::sleep(Duration::from_millis(500)).await;
        let choice = correct(&session);
        session.select_answer(&choice).unwrap();
        session.reveal().unwrap();

        // Reveal delay and countdown both end at 2s. Apply the reveal first.
        time::sleep(Duration::from_millis(1501)).await;
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events.sort_by_key(|event| !matches!(event.kind, EventKind::RevealElapsed { .. }));
        assert!(matches!(events[0].kind, EventKind::RevealElapsed { .. }));

        let transitions: Vec<Transition> = events.into_iter().map(|event| session.handle(event)).collect();
        assert_eq!(transitions[0], Transition::TimedOut);
        assert!(!transitions.iter().any(|t| matches!(t, Transition::Completed(_))));
        assert_eq!(session.phase(), Phase::TimedOut);
        assert!(session.state().results.is_empty());
        assert_eq!(session.state().score, 0);
        assert_eq!(session.state().time_remaining_secs, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_starts_fresh_countdown() {
        let (scheduler, mut rx) = Scheduler::channel();
        let settings = SessionSettings {
            time_limit_secs: 2,
            ..SessionSettings::default()
        };
        let mut session = QuizSession::new(questions(2), settings, scheduler).unwrap();
        assert_eq!(drive(&mut session, &mut rx).await, Transition::TimedOut);

        session.restart().unwrap();
        let restarted = Instant::now();
        assert_eq!(session.state().time_remaining_secs, 2);
        assert_eq!(drive(&mut session, &mut rx).await, Transition::TimedOut);
        assert_eq!(restarted.elapsed(), Duration::from_secs(2));
    }
}
