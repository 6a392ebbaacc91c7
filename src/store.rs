use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{AutoTranslateError, Result};
use crate::record::TranslatableRecord;

/// Persistence owned by the host; the translator side only ever calls into it
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn load(&self, id: &str) -> Result<TranslatableRecord>;

    async fn save(&self, record: &mut TranslatableRecord) -> Result<()>;
}

/// Stores each record as `<id>.json` inside one directory
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn record_path(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AutoTranslateError::Persistence(format!("Invalid record id '{}'", id)));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self, id: &str) -> Result<TranslatableRecord> {
        let path = self.record_path(id)?;
        debug!("Loading record from {}", path.display());

        let content = fs::read_to_string(&path).await
            .map_err(|e| AutoTranslateError::Persistence(format!("Failed to read {}: {}", path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| AutoTranslateError::Persistence(format!("Failed to parse {}: {}", path.display(), e)))
    }

    async fn save(&self, record: &mut TranslatableRecord) -> Result<()> {
        let path = self.record_path(&record.id)?;

        fs::create_dir_all(&self.dir).await
            .map_err(|e| AutoTranslateError::Persistence(format!("Failed to create {}: {}", self.dir.display(), e)))?;

        record.updated_at = Some(Utc::now());
        let content = serde_json::to_string_pretty(record)
            .map_err(|e| AutoTranslateError::Persistence(format!("Failed to serialize record {}: {}", record.id, e)))?;

        // Write next to the target first so a crash never leaves a truncated record
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content).await
            .map_err(|e| AutoTranslateError::Persistence(format!("Failed to write {}: {}", tmp_path.display(), e)))?;
        fs::rename(&tmp_path, &path).await
            .map_err(|e| AutoTranslateError::Persistence(format!("Failed to replace {}: {}", path.display(), e)))?;

        info!("Record {} saved to {}", record.id, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Translatable;

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("records"));

        let mut record = TranslatableRecord::new("post-1", "en", ["title"])
            .with_translation("title", "en", "Hello");
        store.save(&mut record).await.unwrap();
        assert!(record.updated_at.is_some());

        let loaded = store.load("post-1").await.unwrap();
        assert_eq!(loaded.translation("title", "en"), Some("Hello"));
        assert_eq!(loaded.updated_at, record.updated_at);
        assert!(!dir.path().join("records/post-1.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_record_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let result = store.load("absent").await;
        assert!(matches!(result, Err(AutoTranslateError::Persistence(_))));
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let store = JsonFileStore::new("/tmp/records");
        assert!(store.record_path("../etc/passwd").is_err());
        assert!(store.record_path("").is_err());
        assert!(store.record_path("post_1-a").is_ok());
    }

    #[test]
    fn test_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let store = JsonFileStore::new(dir.path());

        let result = tokio_test::block_on(store.load("bad"));
        assert!(matches!(result, Err(AutoTranslateError::Persistence(_))));
    }
}
