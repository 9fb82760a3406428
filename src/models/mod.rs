mod question;
mod result;

pub use question::{Difficulty, Question};
pub use result::{stars, HistoryEntry, QuestionResult, MAX_STARS};

/// Screen currently shown by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    /// Questions are being fetched; no session exists yet.
    Loading,
    Quiz,
    Result { score: usize, total: usize },
    History,
    HistoryDetail,
}
