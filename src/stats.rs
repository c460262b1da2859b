use crate::models::{CustomLevel, Word};
use serde::Serialize;

/// Rounded percentage of correct answers, 0 when nothing was attempted.
pub fn accuracy_percent(correct: u64, attempts: u64) -> u32 {
    if attempts == 0 {
        return 0;
    }
    ((correct as f64 / attempts as f64) * 100.0).round() as u32
}

/// Aggregate numbers shown on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyStats {
    pub total_words: usize,
    pub total_attempts: u64,
    pub correct_answers: u64,
    pub accuracy: u32,
}

impl VocabularyStats {
    pub fn from_words(words: &[Word]) -> Self {
        let total_attempts: u64 = words.iter().map(|w| w.total_attempts as u64).sum();
        let correct_answers: u64 = words.iter().map(|w| w.correct_answers as u64).sum();
        Self {
            total_words: words.len(),
            total_attempts,
            correct_answers,
            accuracy: accuracy_percent(correct_answers, total_attempts),
        }
    }
}

/// Per-level line of the statistics summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    pub name: String,
    pub words: usize,
    pub attempts: u32,
    pub accuracy: u32,
}

pub fn summarize_levels(levels: &[CustomLevel], words: &[Word]) -> Vec<LevelSummary> {
    levels
        .iter()
        .map(|level| LevelSummary {
            name: level.name.clone(),
            words: level.resolve_words(words).len(),
            attempts: level.attempts,
            accuracy: level.accuracy(),
        })
        .collect()
}

/// Matches the English side case-insensitively and the Arabic side verbatim.
pub fn search_words<'a>(words: &'a [Word], term: &str) -> Vec<&'a Word> {
    let term = term.trim();
    if term.is_empty() {
        return words.iter().collect();
    }
    let lowered = term.to_lowercase();
    words
        .iter()
        .filter(|w| w.english.to_lowercase().contains(&lowered) || w.arabic.contains(term))
        .collect()
}
