use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use stepwright_core_types::{NormalizedKey, StepRecord};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::errors::RepoError;

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait StepRepository: Send + Sync {
    /// Stored plan for `key`. A key with no plan is `Ok(None)`.
    async fn lookup(&self, key: &NormalizedKey) -> RepoResult<Option<StepRecord>>;

    /// Store a new plan under its `normalizedStep`. Existing keys are refused.
    async fn insert(&self, record: StepRecord) -> RepoResult<()>;

    /// Delete the plan for `key`; `false` when there was none.
    async fn remove(&self, key: &NormalizedKey) -> RepoResult<bool>;

    /// All stored keys, sorted.
    async fn keys(&self) -> RepoResult<Vec<NormalizedKey>>;

    /// Where the plan for `key` lives (or would live), for diagnostics.
    fn describe_location(&self, key: &NormalizedKey) -> String;
}

fn record_key(record: &StepRecord) -> RepoResult<NormalizedKey> {
    let key = record.normalized_step.trim();
    if key.is_empty() {
        return Err(RepoError::invalid_input("record has no normalizedStep"));
    }
    Ok(NormalizedKey::from_normalized(key))
}

/// One JSON file per key under a root directory.
#[derive(Clone, Debug)]
pub struct FileStepRepository {
    root: PathBuf,
}

impl FileStepRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &NormalizedKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn partial_path_for(&self, key: &NormalizedKey) -> PathBuf {
        self.root.join(format!("{}.partial", key.file_name()))
    }
}

async fn write_file(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(body).await?;
    file.flush().await?;
    file.sync_all().await
}

#[async_trait]
impl StepRepository for FileStepRepository {
    async fn lookup(&self, key: &NormalizedKey) -> RepoResult<Option<StepRecord>> {
        let path = self.path_for(key);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(key = %key, path = %path.display(), "No recorded plan");
                return Ok(None);
            }
            Err(err) => return Err(RepoError::io(path.display().to_string(), &err)),
        };

        let record: StepRecord = serde_json::from_str(&raw)
            .map_err(|err| RepoError::corrupt(path.display().to_string(), err))?;
        debug!(key = %key, actions = record.actions.len(), "Loaded recorded plan");
        Ok(Some(record))
    }

    async fn insert(&self, record: StepRecord) -> RepoResult<()> {
        let key = record_key(&record)?;
        let path = self.path_for(&key);
        let shown = path.display().to_string();

        let body = serde_json::to_vec_pretty(&record)
            .map_err(|err| RepoError::invalid_input(err.to_string()))?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| RepoError::io(self.root.display().to_string(), &err))?;

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|err| RepoError::io(shown.clone(), &err))?;
        if exists {
            warn!(key = %key, path = %shown, "Step already recorded, not overwriting");
            return Err(RepoError::already_exists(key.as_str()));
        }

        // The plan only appears under its key once fully written
        let partial = self.partial_path_for(&key);
        if let Err(err) = write_file(&partial, &body).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(RepoError::io(partial.display().to_string(), &err));
        }
        if let Err(err) = tokio::fs::rename(&partial, &path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(RepoError::io(shown, &err));
        }

        info!(key = %key, path = %shown, "Saved recorded plan");
        Ok(())
    }

    async fn remove(&self, key: &NormalizedKey) -> RepoResult<bool> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(key = %key, "Removed recorded plan");
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(RepoError::io(path.display().to_string(), &err)),
        }
    }

    async fn keys(&self) -> RepoResult<Vec<NormalizedKey>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(RepoError::io(self.root.display().to_string(), &err)),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| RepoError::io(self.root.display().to_string(), &err))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(NormalizedKey::from_normalized(stem));
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn describe_location(&self, key: &NormalizedKey) -> String {
        self.path_for(key).display().to_string()
    }
}

/// Map-backed repository for tests and embedding.
#[derive(Clone, Default)]
pub struct InMemoryStepRepository {
    inner: Arc<RwLock<HashMap<NormalizedKey, StepRecord>>>,
}

impl InMemoryStepRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a plan, replacing any plan stored under the same key.
    pub fn with_record(self, record: StepRecord) -> Self {
        if let Ok(key) = record_key(&record) {
            self.inner.write().insert(key, record);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[async_trait]
impl StepRepository for InMemoryStepRepository {
    async fn lookup(&self, key: &NormalizedKey) -> RepoResult<Option<StepRecord>> {
        Ok(self.inner.read().get(key).cloned())
    }

    async fn insert(&self, record: StepRecord) -> RepoResult<()> {
        let key = record_key(&record)?;
        let mut guard = self.inner.write();
        if guard.contains_key(&key) {
            return Err(RepoError::already_exists(key.as_str()));
        }
        guard.insert(key, record);
        Ok(())
    }

    async fn remove(&self, key: &NormalizedKey) -> RepoResult<bool> {
        Ok(self.inner.write().remove(key).is_some())
    }

    async fn keys(&self) -> RepoResult<Vec<NormalizedKey>> {
        let mut keys: Vec<NormalizedKey> = self.inner.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn describe_location(&self, key: &NormalizedKey) -> String {
        format!("memory:{}", key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RepoErrorKind;
    use stepwright_core_types::{normalize_step, Action, ActionKind};

    fn record(step: &str) -> StepRecord {
        let key = normalize_step(step);
        let mut record: StepRecord = serde_json::from_value(serde_json::json!({
            "stepFileName": key.as_str(),
            "gherkinStep": step,
            "normalizedStep": key.as_str(),
        }))
        .unwrap();
        record.actions.push(Action::new(1, ActionKind::Click));
        record
    }

    #[tokio::test]
    async fn file_lookup_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStepRepository::new(dir.path().join("steps"));
        let found = repo.lookup(&normalize_step("user logs in")).await.unwrap();
        assert!(found.is_none());
        assert!(repo.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_write_leaves_no_plan_behind() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStepRepository::new(dir.path());
        let key = normalize_step("user opens the menu");
        let blocker = dir.path().join("user_opens_the_menu.json.partial");
        std::fs::create_dir(&blocker).unwrap();

        let err = repo.insert(record("user opens the menu")).await.unwrap_err();
        assert!(matches!(err.kind(), RepoErrorKind::Io { .. }));
        assert!(!repo.path_for(&key).exists());
        assert!(repo.lookup(&key).await.unwrap().is_none());
        assert!(repo.keys().await.unwrap().is_empty());

        std::fs::remove_dir(&blocker).unwrap();
        repo.insert(record("user opens the menu")).await.unwrap();
        assert!(repo.lookup(&key).await.unwrap().is_some());
        assert!(!blocker.exists());
    }

    #[tokio::test]
    async fn file_insert_then_lookup_by_any_literal() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStepRepository::new(dir.path());
        repo.insert(record(r#"user enters "Dallas""#)).await.unwrap();

        let found = repo
            .lookup(&normalize_step(r#"user enters "Houston""#))
            .await
            .unwrap()
            .expect("plan stored under the shared key");
        assert_eq!(found.gherkin_step, r#"user enters "Dallas""#);
        assert!(dir.path().join("user_enters_param.json").exists());
        assert_eq!(
            repo.keys().await.unwrap(),
            vec![NormalizedKey::from_normalized("user_enters_param")]
        );
    }

    #[tokio::test]
    async fn file_insert_refuses_existing_key() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStepRepository::new(dir.path());
        repo.insert(record("user logs in")).await.unwrap();

        let err = repo.insert(record("User logs in!")).await.unwrap_err();
        assert!(matches!(err.kind(), RepoErrorKind::AlreadyExists(key) if key == "user_logs_in"));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken_step.json"), "{ not json").unwrap();
        let repo = FileStepRepository::new(dir.path());

        let err = repo
            .lookup(&NormalizedKey::from_normalized("broken_step"))
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), RepoErrorKind::Corrupt { .. }));
    }

    #[tokio::test]
    async fn file_remove_and_keys_skip_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let repo = FileStepRepository::new(dir.path());
        repo.insert(record("user logs out")).await.unwrap();

        let key = normalize_step("user logs out");
        assert_eq!(repo.keys().await.unwrap(), vec![key.clone()]);
        assert!(repo.remove(&key).await.unwrap());
        assert!(!repo.remove(&key).await.unwrap());
        assert!(repo.lookup(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn in_memory_repository() {
        let repo = InMemoryStepRepository::new().with_record(record("user logs in"));
        let key = normalize_step("user logs in");

        assert!(repo.lookup(&key).await.unwrap().is_some());
        assert!(repo.insert(record("user logs in")).await.is_err());
        assert_eq!(repo.describe_location(&key), "memory:user_logs_in");

        let mut nameless = record("x");
        nameless.normalized_step.clear();
        assert!(matches!(
            repo.insert(nameless).await.unwrap_err().kind(),
            RepoErrorKind::InvalidInput(_)
        ));
    }
}
