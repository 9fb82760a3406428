use thiserror::Error;
use uuid::Uuid;

/// Misuse of a quiz session. Always a caller error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Operation invoked outside the state it is valid in.
    #[error("cannot {operation}: {reason}")]
    InvalidState {
        operation: &'static str,
        reason: &'static str,
    },

    /// The selected answer is not one of the current question's answers.
    #[error("'{0}' is not an answer to the current question")]
    UnknownAnswer(String),

    /// The session already produced its history entry.
    #[error("session {0} was already recorded")]
    AlreadyRecorded(Uuid),

    /// A session needs at least one question.
    #[error("a quiz session needs at least one question")]
    EmptyQuestionSet,
}

impl SessionError {
    pub(crate) fn invalid(operation: &'static str, reason: &'static str) -> Self {
        Self::InvalidState { operation, reason }
    }
}
