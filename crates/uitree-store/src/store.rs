//! State store abstraction

use crate::error::StoreError;
use crate::state::{ChangeLog, UiState};
use async_trait::async_trait;
use uitree_core::UiTree;

/// Default number of history entries kept per subject
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Position at which `entry` keeps `changes` newest first
pub(crate) fn insertion_point<'a>(
    changes: impl IntoIterator<Item = &'a ChangeLog>,
    entry: &ChangeLog,
) -> Option<usize> {
    changes.into_iter().position(|c| c.version <= entry.version)
}

/// Persists one [`UiState`] and a change history per subject
///
/// Writes are guarded by strict version equality: a [`save`] whose
/// `expected_version` differs from the stored version fails with
/// [`StoreError::VersionConflict`] and writes nothing.
///
/// [`save`]: StateStore::save
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load current state, `None` if the subject has none
    async fn load(&self, subject: &str) -> Result<Option<UiState>, StoreError>;

    /// Create the version-1 default state if absent; return the current state
    async fn initialize(&self, subject: &str) -> Result<UiState, StoreError>;

    /// Replace the tree if `expected_version` is current
    ///
    /// # Returns
    /// The new record at `expected_version + 1`.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if the subject has no state
    /// - [`StoreError::VersionConflict`] if the stored version differs
    async fn save(
        &self,
        subject: &str,
        expected_version: u64,
        tree: UiTree,
    ) -> Result<UiState, StoreError>;

    /// Replace state with the default tree at `current + 1` (or 1)
    async fn reset(&self, subject: &str) -> Result<UiState, StoreError>;

    /// Insert a history entry, dropping the oldest beyond the cap
    ///
    /// Entries stay ordered by descending `version`; an entry goes in front
    /// of every entry whose version is not greater than its own.
    async fn record_change(&self, subject: &str, entry: ChangeLog) -> Result<(), StoreError>;

    /// Newest-first history, at most `limit` entries
    async fn history(&self, subject: &str, limit: usize) -> Result<Vec<ChangeLog>, StoreError>;
}
