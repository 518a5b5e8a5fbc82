//! File-backed state store
//!
//! Layout under the store root:
//!
//! ```text
//! users/<subject>/state.json    current UiState, pretty JSON
//! users/<subject>/history.json  {"changes": [...]}, newest first
//! ```
//!
//! Every write replaces the whole file through a temp file and rename.

use crate::error::{check_subject, StoreError};
use crate::state::{default_tree, ChangeLog, UiState, INITIAL_VERSION};
use crate::store::{insertion_point, StateStore, DEFAULT_MAX_HISTORY};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uitree_core::UiTree;

/// State file name
pub const STATE_FILE: &str = "state.json";

/// History file name
pub const HISTORY_FILE: &str = "history.json";

const USERS_DIR: &str = "users";

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    changes: Vec<ChangeLog>,
}

/// [`StateStore`] persisting JSON files under a data directory
///
/// Each subject has an async mutex held across read-check-write, so two
/// saves in the same process never interleave. Conflicts between processes
/// are not detected.
#[derive(Debug)]
pub struct FileStateStore {
    root: PathBuf,
    locks: DashMap<String, Arc<Mutex<()>>>,
    max_history: usize,
}

impl FileStateStore {
    /// Create store rooted at `root` (created lazily on first write)
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: DashMap::new(),
            max_history: DEFAULT_MAX_HISTORY,
        }
    }

    /// Set history cap
    #[must_use]
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Get data directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one subject's files
    ///
    /// # Errors
    /// [`StoreError::InvalidSubject`] if `subject` is not a safe directory name.
    pub fn subject_dir(&self, subject: &str) -> Result<PathBuf, StoreError> {
        check_subject(subject)?;
        Ok(self.root.join(USERS_DIR).join(subject))
    }

    fn lock_for(&self, subject: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(subject.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    async fn read_state(&self, subject: &str) -> Result<Option<UiState>, StoreError> {
        read_json(&self.subject_dir(subject)?.join(STATE_FILE)).await
    }

    async fn write_state(&self, state: &UiState) -> Result<(), StoreError> {
        write_json(&self.subject_dir(&state.user_id)?.join(STATE_FILE), state).await
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self, subject: &str) -> Result<Option<UiState>, StoreError> {
        self.read_state(subject).await
    }

    async fn initialize(&self, subject: &str) -> Result<UiState, StoreError> {
        let lock = self.lock_for(subject);
        let _guard = lock.lock().await;

        if let Some(existing) = self.read_state(subject).await? {
            return Ok(existing);
        }

        let state = UiState::initial(subject);
        self.write_state(&state).await?;

        let history = self.subject_dir(subject)?.join(HISTORY_FILE);
        if read_json::<HistoryFile>(&history).await?.is_none() {
            write_json(&history, &HistoryFile::default()).await?;
        }

        info!(subject, root = %self.root.display(), "initialized UI state");
        Ok(state)
    }

    async fn save(
        &self,
        subject: &str,
        expected_version: u64,
        tree: UiTree,
    ) -> Result<UiState, StoreError> {
        // Unknown subjects fail before a lock entry is created for them
        if self.read_state(subject).await?.is_none() {
            return Err(StoreError::NotFound(subject.to_string()));
        }

        let lock = self.lock_for(subject);
        let _guard = lock.lock().await;

        let current = self
            .read_state(subject)
            .await?
            .ok_or_else(|| StoreError::NotFound(subject.to_string()))?;

        if current.version != expected_version {
            warn!(
                subject,
                expected = expected_version,
                actual = current.version,
                "version conflict"
            );
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                actual: current.version,
            });
        }

        let next = current.next(tree);
        self.write_state(&next).await?;
        info!(subject, version = next.version, "saved UI state");
        Ok(next)
    }

    async fn reset(&self, subject: &str) -> Result<UiState, StoreError> {
        let lock = self.lock_for(subject);
        let _guard = lock.lock().await;

        let state = match self.read_state(subject).await? {
            Some(current) => current.next(default_tree()),
            None => UiState::new(subject, INITIAL_VERSION, default_tree()),
        };
        self.write_state(&state).await?;
        info!(subject, version = state.version, "reset UI state");
        Ok(state)
    }

    async fn record_change(&self, subject: &str, entry: ChangeLog) -> Result<(), StoreError> {
        let lock = self.lock_for(subject);
        let _guard = lock.lock().await;

        let path = self.subject_dir(subject)?.join(HISTORY_FILE);
        let mut history = read_json::<HistoryFile>(&path).await?.unwrap_or_default();
        let at = insertion_point(&history.changes, &entry).unwrap_or(history.changes.len());
        history.changes.insert(at, entry);
        history.changes.truncate(self.max_history);
        write_json(&path, &history).await?;

        debug!(subject, entries = history.changes.len(), "recorded change");
        Ok(())
    }

    async fn history(&self, subject: &str, limit: usize) -> Result<Vec<ChangeLog>, StoreError> {
        let path = self.subject_dir(subject)?.join(HISTORY_FILE);
        let mut changes = read_json::<HistoryFile>(&path)
            .await?
            .map(|h| h.changes)
            .unwrap_or_default();
        changes.truncate(limit);
        Ok(changes)
    }
}

/// Read and parse a JSON file, `None` if it does not exist
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::corrupt(path, e)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io_error(path, e)),
    }
}

/// Write pretty JSON, creating parent directories as needed
async fn write_json<T: Serialize + Sync>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| StoreError::io_error(dir, e))?;
    }

    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes)
        .await
        .map_err(|e| StoreError::io_error(&tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn initialize_writes_layout() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path());

        let state = store.initialize("alice").await.unwrap();
        assert_eq!(state.version, 1);

        let user_dir = dir.path().join("users").join("alice");
        assert!(user_dir.join(STATE_FILE).exists());
        let history = std::fs::read_to_string(user_dir.join(HISTORY_FILE)).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&history).unwrap(),
            serde_json::json!({"changes": []})
        );
        assert!(!user_dir.join("state.json.tmp").exists());
    }

    #[tokio::test]
    async fn rejects_escaping_subject() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path());
        let err = store.initialize("../outside").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidSubject(_)));
    }

    #[tokio::test]
    async fn save_unknown_subject_takes_no_lock() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path());

        for ghost in ["ghost-1", "ghost-2", "ghost-3"] {
            let err = store.save(ghost, 1, UiTree::new("Card")).await.unwrap_err();
            assert!(matches!(err, StoreError::NotFound(_)));
        }
        assert!(store.locks.is_empty());

        store.initialize("alice").await.unwrap();
        store.save("alice", 1, UiTree::new("Card")).await.unwrap();
        assert_eq!(store.locks.len(), 1);
    }

    #[tokio::test]
    async fn history_orders_by_version() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path());

        for version in [3, 2, 4] {
            let entry = ChangeLog::new(format!("v{version}"), UiTree::new("A"), UiTree::new("B"))
                .with_version(version);
            store.record_change("alice", entry).await.unwrap();
        }

        let versions: Vec<_> = store
            .history("alice", 10)
            .await
            .unwrap()
            .iter()
            .map(|c| c.version)
            .collect();
        assert_eq!(versions, vec![4, 3, 2]);
    }

    #[tokio::test]
    async fn corrupt_state_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path());
        let user_dir = store.subject_dir("bob").unwrap();
        std::fs::create_dir_all(&user_dir).unwrap();
        std::fs::write(user_dir.join(STATE_FILE), "{not json").unwrap();

        let err = store.load("bob").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
