use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One English/Arabic pair with its accuracy statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    pub english: String,
    pub arabic: String,
    pub date_added: String,
    pub correct_answers: u32,
    pub total_attempts: u32,
}

impl Word {
    pub fn new(id: String, english: &str, arabic: &str, date_added: String) -> Self {
        Self {
            id,
            english: english.trim().to_string(),
            arabic: arabic.trim().to_string(),
            date_added,
            correct_answers: 0,
            total_attempts: 0,
        }
    }

    /// A word counts as an error once it has been missed more often than hit.
    pub fn has_errors(&self) -> bool {
        self.total_attempts > 0 && self.total_attempts > self.correct_answers
    }

    pub fn accuracy(&self) -> u32 {
        crate::stats::accuracy_percent(self.correct_answers.into(), self.total_attempts.into())
    }

    /// Counters saturate at `u32::MAX` instead of wrapping.
    pub fn record(&mut self, is_correct: bool) {
        self.total_attempts = self.total_attempts.saturating_add(1);
        if is_correct {
            self.correct_answers = self.correct_answers.saturating_add(1);
        }
    }
}

/// Partial update of a stored word. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arabic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_attempts: Option<u32>,
}

impl WordPatch {
    pub fn text(english: &str, arabic: &str) -> Self {
        Self {
            english: Some(english.to_string()),
            arabic: Some(arabic.to_string()),
            ..Self::default()
        }
    }
}

/// Which side of the pair a custom level quizzes on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LevelType {
    #[default]
    English,
    Arabic,
}

impl TryFrom<u8> for LevelType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LevelType::English),
            2 => Ok(LevelType::Arabic),
            other => Err(format!("unknown level type {other}")),
        }
    }
}

impl From<LevelType> for u8 {
    fn from(value: LevelType) -> Self {
        match value {
            LevelType::English => 1,
            LevelType::Arabic => 2,
        }
    }
}

impl std::str::FromStr for LevelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "english" | "1" => Ok(LevelType::English),
            "arabic" | "2" => Ok(LevelType::Arabic),
            other => Err(format!("unknown level type '{other}' (expected english or arabic)")),
        }
    }
}

/// A user-named subset of words with its own aggregate statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLevel {
    pub name: String,
    pub word_ids: Vec<String>,
    pub attempts: u32,
    pub correct_answers: u32,
    #[serde(rename = "type")]
    pub level_type: LevelType,
}

impl CustomLevel {
    pub fn accuracy(&self) -> u32 {
        crate::stats::accuracy_percent(self.correct_answers.into(), self.attempts.into())
    }

    pub fn record(&mut self, is_correct: bool) {
        self.attempts = self.attempts.saturating_add(1);
        if is_correct {
            self.correct_answers = self.correct_answers.saturating_add(1);
        }
    }

    /// Materializes the level's words in level order, dropping ids that no
    /// longer exist. A repeated id yields the word once, at its first position.
    pub fn resolve_words(&self, words: &[Word]) -> Vec<Word> {
        let mut seen = HashSet::new();
        self.word_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| words.iter().find(|w| &w.id == id))
            .cloned()
            .collect()
    }
}

/// Input for creating a custom level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLevel {
    pub name: String,
    pub word_ids: Vec<String>,
    pub level_type: LevelType,
}

/// A custom level as found in storage, possibly written before `type`
/// (or the statistics fields) existed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLevel {
    pub name: String,
    #[serde(default)]
    pub word_ids: Vec<String>,
    #[serde(default)]
    pub attempts: Option<u32>,
    #[serde(default)]
    pub correct_answers: Option<u32>,
    /// Kept loose so a bad value (`0`, `""`, `null`) is defaulted instead of
    /// making the whole collection unreadable.
    #[serde(default, rename = "type")]
    pub level_type: Option<serde_json::Value>,
}

fn stored_level_type(value: Option<&serde_json::Value>) -> Option<LevelType> {
    let code = value?.as_u64()?;
    u8::try_from(code).ok()?.try_into().ok()
}

/// Upgrades a stored level to the current shape. The flag is `true` when the
/// record had to be changed and should be written back. A missing or
/// unrecognized `type` becomes English.
pub fn migrate_level(raw: RawLevel) -> (CustomLevel, bool) {
    let level_type = stored_level_type(raw.level_type.as_ref());
    let level = CustomLevel {
        name: raw.name,
        word_ids: raw.word_ids,
        attempts: raw.attempts.unwrap_or(0),
        correct_answers: raw.correct_answers.unwrap_or(0),
        level_type: level_type.unwrap_or_default(),
    };
    (level, level_type.is_none())
}
