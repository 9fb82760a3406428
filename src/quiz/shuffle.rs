//! Per-question answer ordering.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::models::Question;

/// Produces a random display order for a question's answers and keeps it
/// until a different question index is asked for.
pub struct AnswerShuffler {
    rng: StdRng,
    memo: Option<(usize, Vec<String>)>,
}

impl AnswerShuffler {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            memo: None,
        }
    }

    /// Deterministic shuffler for reproducible orders.
    #[cfg(test)]
    pub(crate) fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            memo: None,
        }
    }

    /// Answers for the question at `index`, shuffled on first request.
    pub fn shuffle(&mut self, index: usize, question: &Question) -> &[String] {
        let cached = matches!(&self.memo, Some((i, _)) if *i == index);
        if !cached {
            let mut answers = question.answer_set();
            answers.shuffle(&mut self.rng);
            self.memo = Some((index, answers));
        }
        self.current().unwrap_or_default()
    }

    /// The memoized order, if any question has been shuffled.
    pub fn current(&self) -> Option<&[String]> {
        self.memo.as_ref().map(|(_, answers)| answers.as_slice())
    }

    /// Forget the memoized order so the next request reshuffles.
    pub fn reset(&mut self) {
        self.memo = None;
    }
}

impl Default for AnswerShuffler {
    fn default() -> Self {
        Self::new()
    }
}
