//! Practice round over a fixed word list: the Arabic side is shown and the
//! English word is typed. Nothing is recorded.

use crate::models::Word;
use crate::quiz::{self, expected_english};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillFeedback {
    /// Answer accepted; the full English entry is revealed.
    Correct { answer: String },
    /// Wrong answer; the same word stays up.
    TryAgain,
}

#[derive(Debug)]
pub struct ArabicDrill {
    words: Vec<Word>,
    current: Option<usize>,
    feedback: Option<DrillFeedback>,
    rng: StdRng,
}

impl ArabicDrill {
    pub fn new(words: Vec<Word>) -> Self {
        Self::with_rng(words, StdRng::from_entropy())
    }

    pub fn with_rng(words: Vec<Word>, mut rng: StdRng) -> Self {
        let current = quiz::select_next_index(words.len(), None, &mut rng);
        Self {
            words,
            current,
            feedback: None,
            rng,
        }
    }

    pub fn current(&self) -> Option<&Word> {
        self.current.map(|idx| &self.words[idx])
    }

    /// Arabic text to translate, `None` when there are no words.
    pub fn prompt(&self) -> Option<&str> {
        self.current().map(|w| w.arabic.as_str())
    }

    pub fn feedback(&self) -> Option<&DrillFeedback> {
        self.feedback.as_ref()
    }

    pub fn revealed(&self) -> bool {
        matches!(self.feedback, Some(DrillFeedback::Correct { .. }))
    }

    /// Returns `None` when the input is ignored: blank, no words, or the
    /// answer is already revealed.
    pub fn submit(&mut self, input: &str) -> Option<&DrillFeedback> {
        if input.trim().is_empty() || self.revealed() {
            return None;
        }
        let word = self.current()?;

        let feedback = if quiz::grade_english(word, input) {
            DrillFeedback::Correct {
                answer: word.english.clone(),
            }
        } else {
            DrillFeedback::TryAgain
        };
        self.feedback = Some(feedback);
        self.feedback.as_ref()
    }

    /// Moves to a different word whenever there is more than one.
    pub fn next(&mut self) -> Option<&Word> {
        self.current = quiz::select_next_index(self.words.len(), self.current, &mut self.rng);
        self.feedback = None;
        self.current()
    }

    /// The part of the English entry the drill accepts, for hints.
    pub fn expected(&self) -> Option<String> {
        self.current().map(|w| expected_english(&w.english))
    }
}
