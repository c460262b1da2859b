//! Question selection, grading and statistics recording.

use crate::db::{LevelStore, WordStore};
use crate::error::StoreError;
use crate::models::{CustomLevel, LevelType, Word};
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use std::sync::LazyLock;

static LATIN_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z-]+").expect("valid regex"));

/// Which side of the pair is shown and which one is typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizDirection {
    /// Show English, answer in Arabic.
    #[default]
    EnglishToArabic,
    /// Show Arabic, answer with the English word.
    ArabicToEnglish,
}

impl QuizDirection {
    pub fn prompt(self, word: &Word) -> &str {
        match self {
            QuizDirection::EnglishToArabic => &word.english,
            QuizDirection::ArabicToEnglish => &word.arabic,
        }
    }

    pub fn expected(self, word: &Word) -> &str {
        match self {
            QuizDirection::EnglishToArabic => &word.arabic,
            QuizDirection::ArabicToEnglish => &word.english,
        }
    }

    pub fn grade(self, word: &Word, answer: &str) -> bool {
        match self {
            QuizDirection::EnglishToArabic => grade(word, answer),
            QuizDirection::ArabicToEnglish => grade_english(word, answer),
        }
    }
}

impl From<LevelType> for QuizDirection {
    fn from(level_type: LevelType) -> Self {
        match level_type {
            LevelType::English => QuizDirection::EnglishToArabic,
            LevelType::Arabic => QuizDirection::ArabicToEnglish,
        }
    }
}

/// Uniformly random question, `None` once the pool is exhausted.
pub fn select_question<'a, R: Rng>(pool: &'a [Word], rng: &mut R) -> Option<&'a Word> {
    pool.choose(rng)
}

/// Random index in `0..len` that differs from `exclude` whenever there is
/// another index to pick.
pub fn select_next_index<R: Rng>(len: usize, exclude: Option<usize>, rng: &mut R) -> Option<usize> {
    match (len, exclude) {
        (0, _) => None,
        (1, _) => Some(0),
        (len, Some(skip)) if skip < len => {
            let idx = rng.gen_range(0..len - 1);
            Some(if idx >= skip { idx + 1 } else { idx })
        }
        (len, _) => Some(rng.gen_range(0..len)),
    }
}

/// Like [`select_question`] but avoids repeating `previous_id` when the pool
/// has another word.
pub fn select_next_question<'a, R: Rng>(
    pool: &'a [Word],
    previous_id: Option<&str>,
    rng: &mut R,
) -> Option<&'a Word> {
    let exclude = previous_id.and_then(|id| pool.iter().position(|w| w.id == id));
    select_next_index(pool.len(), exclude, rng).map(|idx| &pool[idx])
}

/// Exact match against the Arabic side, ignoring case and surrounding
/// whitespace.
pub fn grade(question: &Word, answer: &str) -> bool {
    answer.trim().to_lowercase() == question.arabic.trim().to_lowercase()
}

/// First run of Latin letters and hyphens in the English side, lowercased.
/// Entries like "book (n.)" are answered with just "book".
pub fn expected_english(english: &str) -> String {
    LATIN_WORD
        .find(english)
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_default()
}

pub fn grade_english(question: &Word, answer: &str) -> bool {
    let expected = expected_english(&question.english);
    !expected.is_empty() && answer.trim().to_lowercase() == expected
}

pub async fn record_attempt(
    store: &dyn WordStore,
    word_id: &str,
    is_correct: bool,
) -> Result<Word, StoreError> {
    store.record_stats(word_id, is_correct).await.inspect_err(|e| {
        tracing::warn!(word_id, error = %e, "failed to record word attempt");
    })
}

pub async fn record_level_attempt(
    store: &dyn LevelStore,
    level_name: &str,
    is_correct: bool,
) -> Result<CustomLevel, StoreError> {
    store
        .record_stats(level_name, is_correct)
        .await
        .inspect_err(|e| {
            tracing::warn!(level_name, error = %e, "failed to record level attempt");
        })
}
