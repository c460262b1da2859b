use super::{KvBackend, LEVELS_KEY, LevelStore, read_list, write_list};
use crate::error::StoreError;
use crate::models::{CustomLevel, NewLevel, RawLevel, migrate_level};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct LevelRepository {
    backend: Arc<dyn KvBackend>,
    write_lock: Mutex<()>,
}

impl LevelRepository {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Loads all levels, writing the collection back once if any record
    /// lacks a valid `type`.
    async fn read_all(&self) -> Result<Vec<CustomLevel>, StoreError> {
        let raw: Vec<RawLevel> = read_list(self.backend.as_ref(), LEVELS_KEY).await?;
        let mut migrated_count = 0;
        let levels: Vec<CustomLevel> = raw
            .into_iter()
            .map(|raw| {
                let (level, migrated) = migrate_level(raw);
                if migrated {
                    migrated_count += 1;
                }
                level
            })
            .collect();

        if migrated_count > 0 {
            self.write_all(&levels).await?;
            tracing::info!(migrated = migrated_count, "defaulted missing or invalid level types");
        }

        Ok(levels)
    }

    async fn write_all(&self, levels: &[CustomLevel]) -> Result<(), StoreError> {
        write_list(self.backend.as_ref(), LEVELS_KEY, levels).await
    }
}

#[async_trait]
impl LevelStore for LevelRepository {
    async fn list(&self) -> Result<Vec<CustomLevel>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let levels = self.read_all().await?;
        tracing::debug!(count = levels.len(), "listed custom levels");
        Ok(levels)
    }

    async fn create(&self, level: NewLevel) -> Result<CustomLevel, StoreError> {
        let name = level.name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::Validation("level name is required".to_string()));
        }

        let _guard = self.write_lock.lock().await;
        let mut levels = self.read_all().await?;
        if levels.iter().any(|l| l.name == name) {
            return Err(StoreError::DuplicateName(name));
        }

        let created = CustomLevel {
            name,
            word_ids: level.word_ids,
            attempts: 0,
            correct_answers: 0,
            level_type: level.level_type,
        };
        levels.push(created.clone());
        self.write_all(&levels).await?;

        tracing::info!(
            name = %created.name,
            words = created.word_ids.len(),
            "created custom level"
        );
        Ok(created)
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let levels = self.read_all().await?;
        let before = levels.len();
        let remaining: Vec<CustomLevel> = levels.into_iter().filter(|l| l.name != name).collect();
        if remaining.len() == before {
            return Err(StoreError::level_not_found(name));
        }
        self.write_all(&remaining).await?;

        tracing::info!(name, "deleted custom level");
        Ok(())
    }

    async fn record_stats(
        &self,
        name: &str,
        is_correct: bool,
    ) -> Result<CustomLevel, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut levels = self.read_all().await?;
        let level = levels
            .iter_mut()
            .find(|l| l.name == name)
            .ok_or_else(|| StoreError::level_not_found(name))?;
        level.record(is_correct);
        let updated = level.clone();
        self.write_all(&levels).await?;

        tracing::debug!(name, is_correct, attempts = updated.attempts, "recorded level attempt");
        Ok(updated)
    }

    async fn replace(&self, old_name: &str, level: NewLevel) -> Result<CustomLevel, StoreError> {
        let name = level.name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::Validation("level name is required".to_string()));
        }

        let _guard = self.write_lock.lock().await;
        let mut levels = self.read_all().await?;
        let index = levels
            .iter()
            .position(|l| l.name == old_name)
            .ok_or_else(|| StoreError::level_not_found(old_name))?;
        if name != old_name && levels.iter().any(|l| l.name == name) {
            return Err(StoreError::DuplicateName(name));
        }

        // Same position as delete followed by insert: the edited level moves last.
        let old = levels.remove(index);
        let replaced = CustomLevel {
            name,
            word_ids: level.word_ids,
            attempts: old.attempts,
            correct_answers: old.correct_answers,
            level_type: level.level_type,
        };
        levels.push(replaced.clone());
        self.write_all(&levels).await?;

        tracing::info!(from = old_name, to = %replaced.name, "replaced custom level");
        Ok(replaced)
    }
}

/// Renames or reshapes a level. Statistics carry over to the replacement.
pub async fn edit_level(
    store: &dyn LevelStore,
    old_name: &str,
    replacement: NewLevel,
) -> Result<CustomLevel, StoreError> {
    store.replace(old_name, replacement).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBackend;
    use crate::models::LevelType;

    fn new_level(name: &str, ids: &[&str]) -> NewLevel {
        NewLevel {
            name: name.to_string(),
            word_ids: ids.iter().map(|s| s.to_string()).collect(),
            level_type: LevelType::English,
        }
    }

    fn repo_with_backend() -> (LevelRepository, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        (LevelRepository::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn test_create_zeroes_stats_and_trims_name() {
        let (repo, _) = repo_with_backend();
        let level = repo.create(new_level("  basic ", &["1", "2"])).await.unwrap();
        assert_eq!(level.name, "basic");
        assert_eq!(level.attempts, 0);
        assert_eq!(level.correct_answers, 0);
        assert_eq!(level.word_ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (repo, _) = repo_with_backend();
        assert!(matches!(
            repo.create(new_level("  ", &[])).await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name_leaves_existing_level() {
        let (repo, _) = repo_with_backend();
        repo.create(new_level("basic", &["1"])).await.unwrap();
        repo.record_stats("basic", true).await.unwrap();
        let before = repo.list().await.unwrap();

        let result = repo.create(new_level("basic", &["2", "3"])).await;
        assert_eq!(result, Err(StoreError::DuplicateName("basic".to_string())));
        assert_eq!(repo.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_missing_level() {
        let (repo, _) = repo_with_backend();
        assert_eq!(
            repo.delete("nope").await,
            Err(StoreError::level_not_found("nope"))
        );
    }

    #[tokio::test]
    async fn test_record_stats() {
        let (repo, _) = repo_with_backend();
        repo.create(new_level("basic", &["1"])).await.unwrap();
        repo.record_stats("basic", true).await.unwrap();
        let level = repo.record_stats("basic", false).await.unwrap();
        assert_eq!(level.attempts, 2);
        assert_eq!(level.correct_answers, 1);

        assert!(matches!(
            repo.record_stats("other", true).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_migrates_and_persists_missing_type() {
        let (repo, backend) = repo_with_backend();
        backend
            .set(
                LEVELS_KEY,
                r#"[{"name":"old","wordIds":["1"],"attempts":2,"correctAnswers":1}]"#,
            )
            .await
            .unwrap();

        let levels = repo.list().await.unwrap();
        assert_eq!(levels[0].level_type, LevelType::English);

        let stored = backend.get(LEVELS_KEY).await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(json[0]["type"], 1);
        assert_eq!(json[0]["attempts"], 2);
    }

    #[tokio::test]
    async fn test_list_repairs_invalid_type() {
        let (repo, backend) = repo_with_backend();
        backend
            .set(
                LEVELS_KEY,
                r#"[{"name":"a","wordIds":["1"],"attempts":3,"correctAnswers":2,"type":0},
                    {"name":"b","wordIds":[],"attempts":0,"correctAnswers":0,"type":2}]"#,
            )
            .await
            .unwrap();

        let levels = repo.list().await.unwrap();
        assert_eq!(levels[0].level_type, LevelType::English);
        assert_eq!(levels[0].attempts, 3);
        assert_eq!(levels[1].level_type, LevelType::Arabic);

        let stored = backend.get(LEVELS_KEY).await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(json[0]["type"], 1);
        assert_eq!(json[1]["type"], 2);
    }

    #[tokio::test]
    async fn test_edit_level_renames() {
        let (repo, _) = repo_with_backend();
        repo.create(new_level("basic", &["1"])).await.unwrap();

        let edited = edit_level(&repo, "basic", new_level("starter", &["1", "2"]))
            .await
            .unwrap();
        assert_eq!(edited.name, "starter");

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["starter"]);
    }

    #[tokio::test]
    async fn test_edit_level_keeps_old_on_collision() {
        let (repo, _) = repo_with_backend();
        repo.create(new_level("basic", &["1"])).await.unwrap();
        repo.create(new_level("advanced", &["2"])).await.unwrap();

        let result = edit_level(&repo, "basic", new_level("advanced", &["3"])).await;
        assert!(matches!(result, Err(StoreError::DuplicateName(_))));
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_edit_level_keeps_statistics() {
        let (repo, _) = repo_with_backend();
        repo.create(new_level("basic", &["1"])).await.unwrap();
        for correct in [true, true, false, true, true] {
            repo.record_stats("basic", correct).await.unwrap();
        }

        let edited = edit_level(&repo, "basic", new_level("starter", &["1", "2"]))
            .await
            .unwrap();
        assert_eq!(edited.attempts, 5);
        assert_eq!(edited.correct_answers, 4);
        assert_eq!(repo.list().await.unwrap(), vec![edited]);
    }

    #[tokio::test]
    async fn test_edit_level_moves_level_last() {
        let (repo, _) = repo_with_backend();
        repo.create(new_level("basic", &["1"])).await.unwrap();
        repo.create(new_level("advanced", &["2"])).await.unwrap();

        edit_level(&repo, "basic", new_level("basic", &["3"]))
            .await
            .unwrap();
        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["advanced", "basic"]);
    }

    #[tokio::test]
    async fn test_edit_level_offline_keeps_old_level() {
        let (repo, backend) = repo_with_backend();
        repo.create(new_level("basic", &["1"])).await.unwrap();
        repo.record_stats("basic", true).await.unwrap();
        let before = repo.list().await.unwrap();

        backend.set_unavailable(true);
        let result = edit_level(&repo, "basic", new_level("starter", &["2"])).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));

        backend.set_unavailable(false);
        assert_eq!(repo.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_edit_missing_level() {
        let (repo, _) = repo_with_backend();
        assert_eq!(
            edit_level(&repo, "ghost", new_level("starter", &[])).await,
            Err(StoreError::level_not_found("ghost"))
        );
    }

    #[tokio::test]
    async fn test_edit_level_same_name_updates_words() {
        let (repo, _) = repo_with_backend();
        repo.create(new_level("basic", &["1"])).await.unwrap();
        let edited = edit_level(&repo, "basic", new_level("basic", &["1", "5"]))
            .await
            .unwrap();
        assert_eq!(edited.word_ids, vec!["1", "5"]);
    }
}
