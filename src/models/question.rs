use std::fmt;

use serde::{Deserialize, Serialize};

/// A single multiple-choice trivia question.
///
/// Text fields are kept exactly as the source delivered them; they may
/// contain HTML entities which only the presentation layer decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(alias = "question")]
    pub text: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        correct_answer: impl Into<String>,
        incorrect_answers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            text: text.into(),
            correct_answer: correct_answer.into(),
            incorrect_answers: incorrect_answers.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `answer` belongs to this question's answer set.
    pub fn has_answer(&self, answer: &str) -> bool {
        self.correct_answer == answer || self.incorrect_answers.iter().any(|a| a == answer)
    }

    /// Correct answer followed by the distractors, unshuffled.
    pub fn answer_set(&self) -> Vec<String> {
        let mut answers = Vec::with_capacity(self.incorrect_answers.len() + 1);
        answers.push(self.correct_answer.clone());
        answers.extend(self.incorrect_answers.iter().cloned());
        answers
    }
}

/// Difficulty filter accepted by the question source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
