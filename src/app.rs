use tracing::{debug, warn};

use crate::config::QuizConfig;
use crate::data::{HistoryStore, QuestionSource};
use crate::models::{AppState, HistoryEntry};
use crate::quiz::{Phase, QuizSession, Scheduler, SessionEvent, Transition};

/// Modal shown on top of the quiz screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    /// The countdown ran out; the only way on is a restart.
    TimeUp,
    /// Leaving discards the current attempt.
    ConfirmExit,
}

pub struct App {
    pub state: AppState,
    dialog: Option<Dialog>,
    config: QuizConfig,
    source: Box<dyn QuestionSource>,
    history: Box<dyn HistoryStore>,
    scheduler: Scheduler,
    session: Option<QuizSession>,
    answer_cursor: usize,
    history_cursor: usize,
    detail_scroll: usize,
    notice: Option<String>,
}

impl App {
    pub fn new(
        config: QuizConfig,
        source: Box<dyn QuestionSource>,
        history: Box<dyn HistoryStore>,
        scheduler: Scheduler,
    ) -> Self {
        Self {
            state: AppState::Welcome,
            dialog: None,
            config,
            source,
            history,
            scheduler,
            session: None,
            answer_cursor: 0,
            history_cursor: 0,
            detail_scroll: 0,
            notice: None,
        }
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn dialog(&self) -> Option<Dialog> {
        self.dialog
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn answer_cursor(&self) -> usize {
        self.answer_cursor
    }

    pub fn history_entries(&self) -> &[HistoryEntry] {
        self.history.list()
    }

    pub fn history_cursor(&self) -> usize {
        self.history_cursor
    }

    pub fn selected_history_entry(&self) -> Option<&HistoryEntry> {
        self.history.list().get(self.history_cursor)
    }

    pub fn detail_scroll(&self) -> usize {
        self.detail_scroll
    }

    /// Ask for a new question set. The fetch happens in [`load_session`](Self::load_session).
    pub fn start_quiz(&mut self) {
        self.notice = None;
        self.dialog = None;
        self.state = AppState::Loading;
    }

    /// Fetch questions and open a session; falls back to the welcome screen on failure.
    pub async fn load_session(&mut self) {
        let request = self.config.question_request();
        let questions = match self.source.fetch_questions(&request).await {
            Ok(questions) => questions,
            Err(e) => {
                warn!(error = %e, "could not load questions");
                self.notice = Some(format!("Could not load questions: {}", e));
                self.state = AppState::Welcome;
                return;
            }
        };

        let title = format!("Quiz {}", self.history.len() + 1);
        let settings = self.config.session_settings(title);
        match QuizSession::new(questions, settings, self.scheduler.clone()) {
            Ok(session) => {
                self.session = Some(session);
                self.answer_cursor = 0;
                self.state = AppState::Quiz;
            }
            Err(e) => {
                warn!(error = %e, "could not start session");
                self.notice = Some(e.to_string());
                self.state = AppState::Welcome;
            }
        }
    }

    /// Route a scheduler wake-up to the running session.
    pub fn handle_session_event(&mut self, event: SessionEvent) {
        let Some(session) = self.session.as_mut() else {
            debug!(session = %event.session, "event without a running session");
            return;
        };
        let transition = session.handle(event);
        self.apply(transition);
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Unchanged | Transition::Ticked(_) => {}
            Transition::NextQuestion(_) => {
                self.answer_cursor = 0;
            }
            Transition::Completed(entry) => {
                let (score, total) = (entry.score, entry.total_questions);
                if let Err(e) = self.history.append(entry) {
                    warn!(error = %e, "failed to save quiz result");
                    self.notice = Some(format!("Result not saved: {}", e));
                }
                self.session = None;
                self.dialog = None;
                self.state = AppState::Result { score, total };
            }
            Transition::TimedOut => {
                self.dialog = Some(Dialog::TimeUp);
            }
        }
    }

    fn answers_locked(&self) -> bool {
        self.dialog.is_some()
            || self
                .session
                .as_ref()
                .is_none_or(|s| s.state().revealed || s.phase() != Phase::InProgress)
    }

    pub fn select_next_option(&mut self) {
        if self.answers_locked() {
            return;
        }
        let count = self.session.as_ref().map_or(0, |s| s.answers().len());
        if count > 0 {
            self.answer_cursor = (self.answer_cursor + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        if self.answers_locked() {
            return;
        }
        let count = self.session.as_ref().map_or(0, |s| s.answers().len());
        if count > 0 {
            self.answer_cursor = (self.answer_cursor + count - 1) % count;
        }
    }

    /// Move the cursor straight to answer `index` and submit it.
    pub fn choose_option(&mut self, index: usize) {
        let count = self.session.as_ref().map_or(0, |s| s.answers().len());
        if self.answers_locked() || index >= count {
            return;
        }
        self.answer_cursor = index;
        self.submit_answer();
    }

    /// Select the answer under the cursor and reveal it.
    pub fn submit_answer(&mut self) {
        if self.answers_locked() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(answer) = session.answers().get(self.answer_cursor).cloned() else {
            return;
        };
        if let Err(e) = session.select_answer(&answer).and_then(|_| session.reveal().map(|_| ())) {
            warn!(error = %e, "answer rejected");
        }
    }

    pub fn request_exit(&mut self) {
        if self.state == AppState::Quiz && self.dialog.is_none() {
            self.dialog = Some(Dialog::ConfirmExit);
        }
    }

    /// Discard the running attempt and go back to the welcome screen.
    pub fn confirm_exit(&mut self) {
        if self.dialog != Some(Dialog::ConfirmExit) {
            return;
        }
        if let Some(session) = self.session.take() {
            if let Err(e) = session.exit_early() {
                warn!(error = %e, "exit from a finished session");
            }
        }
        self.dialog = None;
        self.state = AppState::Welcome;
    }

    pub fn dismiss_dialog(&mut self) {
        if self.dialog == Some(Dialog::ConfirmExit) {
            self.dialog = None;
        }
    }

    pub fn restart_after_timeout(&mut self) {
        if self.dialog != Some(Dialog::TimeUp) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.restart() {
            Ok(()) => {
                self.dialog = None;
                self.answer_cursor = 0;
            }
            Err(e) => warn!(error = %e, "restart rejected"),
        }
    }

    pub fn open_history(&mut self) {
        self.notice = None;
        self.history_cursor = self
            .history_cursor
            .min(self.history.len().saturating_sub(1));
        self.state = AppState::History;
    }

    pub fn select_next_history(&mut self) {
        let len = self.history.len();
        if len > 0 {
            self.history_cursor = (self.history_cursor + 1).min(len - 1);
        }
    }

    pub fn select_previous_history(&mut self) {
        self.history_cursor = self.history_cursor.saturating_sub(1);
    }

    pub fn delete_selected_history(&mut self) {
        let Some(id) = self.selected_history_entry().map(|e| e.id) else {
            return;
        };
        match self.history.delete(id) {
            Ok(_) => {
                self.history_cursor = self
                    .history_cursor
                    .min(self.history.len().saturating_sub(1));
                self.notice = Some("Attempt deleted".to_string());
            }
            Err(e) => {
                warn!(error = %e, "failed to delete history entry");
                self.notice = Some(format!("Could not delete: {}", e));
            }
        }
    }

    pub fn open_history_detail(&mut self) {
        if self.selected_history_entry().is_some() {
            self.detail_scroll = 0;
            self.state = AppState::HistoryDetail;
        }
    }

    pub fn scroll_detail_down(&mut self) {
        let max_scroll = self
            .selected_history_entry()
            .map_or(0, |e| e.results.len().saturating_sub(1));
        self.detail_scroll = (self.detail_scroll + 1).min(max_scroll);
    }

    pub fn scroll_detail_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    /// Leave the current non-quiz screen.
    pub fn back(&mut self) {
        self.state = match self.state {
            AppState::HistoryDetail => AppState::History,
            AppState::History | AppState::Result { .. } => AppState::Welcome,
            other => other,
        };
    }
}
