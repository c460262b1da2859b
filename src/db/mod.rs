//! Persistence for words and custom levels.
//!
//! Both stores keep their whole collection as one JSON document under a
//! single key of a [`KvBackend`] and apply every change as read-all, mutate,
//! write-all.

use crate::config::{Config, StorageBackend};
use crate::error::StoreError;
use crate::models::{CustomLevel, NewLevel, Word, WordPatch};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub mod json_file;
pub mod level;
pub mod memory;
pub mod sqlite;
pub mod word;

pub use json_file::JsonFileBackend;
pub use level::{LevelRepository, edit_level};
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
pub use word::WordRepository;

pub const WORDS_KEY: &str = "words";
pub const LEVELS_KEY: &str = "custom-levels";

/// Key to JSON-text storage underneath the repositories.
#[async_trait]
pub trait KvBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Human-readable location, used in log lines.
    fn describe(&self) -> String;
}

/// Durable mapping of word id to word record.
#[async_trait]
pub trait WordStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Word>, StoreError>;

    /// Fails with [`StoreError::Validation`] when either side is blank.
    async fn create(&self, english: &str, arabic: &str) -> Result<Word, StoreError>;

    async fn update(&self, id: &str, patch: WordPatch) -> Result<Word, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Counts one attempt, and one correct answer when `is_correct`.
    async fn record_stats(&self, id: &str, is_correct: bool) -> Result<Word, StoreError>;
}

/// Durable mapping of level name to custom level.
#[async_trait]
pub trait LevelStore: Send + Sync {
    async fn list(&self) -> Result<Vec<CustomLevel>, StoreError>;

    async fn create(&self, level: NewLevel) -> Result<CustomLevel, StoreError>;

    async fn delete(&self, name: &str) -> Result<(), StoreError>;

    async fn record_stats(&self, name: &str, is_correct: bool)
    -> Result<CustomLevel, StoreError>;

    /// Swaps `old_name` for `level` in one write, keeping the statistics.
    async fn replace(&self, old_name: &str, level: NewLevel) -> Result<CustomLevel, StoreError>;
}

/// Both stores over one backend.
#[derive(Clone)]
pub struct Stores {
    pub words: Arc<dyn WordStore>,
    pub levels: Arc<dyn LevelStore>,
}

impl Stores {
    pub fn over(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            words: Arc::new(WordRepository::new(backend.clone())),
            levels: Arc::new(LevelRepository::new(backend)),
        }
    }
}

pub fn open_backend(config: &Config) -> Result<Arc<dyn KvBackend>, StoreError> {
    let backend: Arc<dyn KvBackend> = match config.backend {
        StorageBackend::Json => Arc::new(JsonFileBackend::open(&config.data_dir)?),
        StorageBackend::Sqlite => Arc::new(SqliteBackend::open(&config.db_path())?),
        StorageBackend::Memory => Arc::new(MemoryBackend::new()),
    };
    tracing::info!(location = %backend.describe(), "opened word store");
    Ok(backend)
}

pub fn open_stores(config: &Config) -> Result<Stores, StoreError> {
    Ok(Stores::over(open_backend(config)?))
}

/// Reads a collection; a missing key or a stored `null` is an empty list.
pub(crate) async fn read_list<T: DeserializeOwned>(
    backend: &dyn KvBackend,
    key: &str,
) -> Result<Vec<T>, StoreError> {
    match backend.get(key).await? {
        Some(text) if !text.trim().is_empty() => {
            let items: Option<Vec<T>> = serde_json::from_str(&text)?;
            Ok(items.unwrap_or_default())
        }
        _ => Ok(Vec::new()),
    }
}

pub(crate) async fn write_list<T: Serialize>(
    backend: &dyn KvBackend,
    key: &str,
    items: &[T],
) -> Result<(), StoreError> {
    let text = serde_json::to_string_pretty(items)?;
    backend.set(key, &text).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_list_missing_key_is_empty() {
        let backend = MemoryBackend::new();
        let words: Vec<Word> = read_list(&backend, WORDS_KEY).await.unwrap();
        assert!(words.is_empty());
    }

    #[tokio::test]
    async fn test_read_list_null_is_empty() {
        let backend = MemoryBackend::new();
        backend.set(WORDS_KEY, "null").await.unwrap();
        let words: Vec<Word> = read_list(&backend, WORDS_KEY).await.unwrap();
        assert!(words.is_empty());
    }

    #[tokio::test]
    async fn test_read_list_corrupt_data_is_unavailable() {
        let backend = MemoryBackend::new();
        backend.set(WORDS_KEY, "{not json").await.unwrap();
        let result: Result<Vec<Word>, _> = read_list(&backend, WORDS_KEY).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_stores_share_one_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let stores = Stores::over(backend.clone());
        stores.words.create("book", "كتاب").await.unwrap();
        assert!(backend.get(WORDS_KEY).await.unwrap().is_some());
        assert!(stores.levels.list().await.unwrap().is_empty());
    }
}
