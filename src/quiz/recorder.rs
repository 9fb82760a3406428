//! Conversion of a completed session into a history entry.

use chrono::{DateTime, Local};
use tracing::info;
use uuid::Uuid;

use crate::models::HistoryEntry;

use super::error::SessionError;
use super::session::{Phase, SessionState};

const DATE_FORMAT: &str = "%d.%m.%Y";
const TIME_FORMAT: &str = "%H:%M";

/// Builds the history entry of exactly one session.
///
/// The recorder is bound to a session id and refuses to record twice, so a
/// completed attempt can never land in the history more than once.
#[derive(Debug, Clone)]
pub struct ResultRecorder {
    session: Uuid,
    title: String,
    recorded: bool,
}

impl ResultRecorder {
    pub fn new(session: Uuid, title: impl Into<String>) -> Self {
        Self {
            session,
            title: title.into(),
            recorded: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_recorded(&self) -> bool {
        self.recorded
    }

    /// Record `state`, stamped with the current local time.
    pub fn record(&mut self, state: &SessionState) -> Result<HistoryEntry, SessionError> {
        self.record_at(state, Local::now())
    }

    pub fn record_at(
        &mut self,
        state: &SessionState,
        now: DateTime<Local>,
    ) -> Result<HistoryEntry, SessionError> {
        if state.id != self.session {
            return Err(SessionError::invalid("record", "state belongs to another session"));
        }
        if state.phase != Phase::Completed {
            return Err(SessionError::invalid("record", "session is not completed"));
        }
        if self.recorded {
            return Err(SessionError::AlreadyRecorded(self.session));
        }
        self.recorded = true;

        info!(
            session = %state.id,
            score = state.score,
            total = state.total_questions,
            "recording completed session"
        );
        Ok(HistoryEntry {
            id: Uuid::new_v4(),
            title: self.title.clone(),
            date: now.format(DATE_FORMAT).to_string(),
            time: now.format(TIME_FORMAT).to_string(),
            score: state.score,
            total_questions: state.total_questions,
            results: state.results.clone(),
        })
    }
}
