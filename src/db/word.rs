use super::{KvBackend, WORDS_KEY, WordStore, read_list, write_list};
use crate::error::StoreError;
use crate::models::{Word, WordPatch};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct WordRepository {
    backend: Arc<dyn KvBackend>,
    write_lock: Mutex<()>,
}

impl WordRepository {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<Word>, StoreError> {
        read_list(self.backend.as_ref(), WORDS_KEY).await
    }

    async fn write_all(&self, words: &[Word]) -> Result<(), StoreError> {
        write_list(self.backend.as_ref(), WORDS_KEY, words).await
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Millisecond timestamp id, bumped past any id already in use.
fn next_id(words: &[Word]) -> String {
    let mut candidate = chrono::Utc::now().timestamp_millis();
    while words.iter().any(|w| w.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

fn required(value: &str, field: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn apply_patch(word: &Word, patch: WordPatch) -> Result<Word, StoreError> {
    let mut updated = word.clone();
    if let Some(english) = patch.english {
        updated.english = required(&english, "english")?;
    }
    if let Some(arabic) = patch.arabic {
        updated.arabic = required(&arabic, "arabic")?;
    }
    if let Some(correct) = patch.correct_answers {
        updated.correct_answers = correct;
    }
    if let Some(total) = patch.total_attempts {
        updated.total_attempts = total;
    }
    if updated.correct_answers > updated.total_attempts {
        return Err(StoreError::Validation(
            "correctAnswers cannot exceed totalAttempts".to_string(),
        ));
    }
    Ok(updated)
}

#[async_trait]
impl WordStore for WordRepository {
    async fn list(&self) -> Result<Vec<Word>, StoreError> {
        let words = self.read_all().await?;
        tracing::debug!(count = words.len(), "listed words");
        Ok(words)
    }

    async fn create(&self, english: &str, arabic: &str) -> Result<Word, StoreError> {
        let english = required(english, "english")?;
        let arabic = required(arabic, "arabic")?;

        let _guard = self.write_lock.lock().await;
        let mut words = self.read_all().await?;
        let word = Word::new(next_id(&words), &english, &arabic, today());
        words.push(word.clone());
        self.write_all(&words).await?;

        tracing::info!(id = %word.id, english = %word.english, "added word");
        Ok(word)
    }

    async fn update(&self, id: &str, patch: WordPatch) -> Result<Word, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut words = self.read_all().await?;
        let index = words
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| StoreError::word_not_found(id))?;

        let updated = apply_patch(&words[index], patch)?;
        words[index] = updated.clone();
        self.write_all(&words).await?;

        tracing::info!(id, "updated word");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let words = self.read_all().await?;
        let before = words.len();
        let remaining: Vec<Word> = words.into_iter().filter(|w| w.id != id).collect();
        if remaining.len() == before {
            return Err(StoreError::word_not_found(id));
        }
        self.write_all(&remaining).await?;

        tracing::info!(id, "deleted word");
        Ok(())
    }

    async fn record_stats(&self, id: &str, is_correct: bool) -> Result<Word, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut words = self.read_all().await?;
        let word = words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| StoreError::word_not_found(id))?;
        word.record(is_correct);
        let updated = word.clone();
        self.write_all(&words).await?;

        tracing::debug!(
            id,
            is_correct,
            correct = updated.correct_answers,
            total = updated.total_attempts,
            "recorded word attempt"
        );
        Ok(updated)
    }
}
