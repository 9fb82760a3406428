use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_text: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    /// Answers in the order they were displayed.
    pub all_answers: Vec<String>,
}

/// A completed quiz attempt as stored in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub title: String,
    /// Local date, `dd.mm.yyyy`.
    pub date: String,
    /// Local time, `hh:mm`.
    pub time: String,
    pub score: usize,
    pub total_questions: usize,
    pub results: Vec<QuestionResult>,
}

impl HistoryEntry {
    pub fn stars(&self) -> u8 {
        stars(self.score, self.total_questions)
    }
}

/// Maximum number of stars a result can earn.
pub const MAX_STARS: u8 = 5;

/// Rate a score on a 0-5 star scale in 20% steps.
pub fn stars(score: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }

    let ratio = score as f64 / total as f64;
    match ratio {
        r if r >= 1.0 => 5,
        r if r >= 0.8 => 4,
        r if r >= 0.6 => 3,
        r if r >= 0.4 => 2,
        r if r >= 0.2 => 1,
        _ => 0,
    }
}
