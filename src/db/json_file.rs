use super::{KvBackend, LEVELS_KEY, WORDS_KEY};
use crate::error::StoreError;
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One `<key>.json` file per collection inside a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Creates the directory and seeds empty collections if needed.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        let backend = Self {
            dir: dir.to_path_buf(),
        };

        for key in [WORDS_KEY, LEVELS_KEY] {
            let path = backend.path_for(key);
            if !path.exists() {
                write_atomic(&backend.dir, &path, "[]")?;
                tracing::debug!(path = %path.display(), "initialized empty collection");
            }
        }

        Ok(backend)
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn write_atomic(dir: &Path, path: &Path, contents: &str) -> Result<(), StoreError> {
    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(contents.as_bytes())?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl KvBackend for JsonFileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        tokio::task::spawn_blocking(move || match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::from(e)),
        })
        .await?
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let dir = self.dir.clone();
        let path = self.path_for(key);
        let value = value.to_string();
        tokio::task::spawn_blocking(move || write_atomic(&dir, &path, &value)).await?
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
