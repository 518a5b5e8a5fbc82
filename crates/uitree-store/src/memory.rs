//! In-memory state store

use crate::error::{check_subject, StoreError};
use crate::state::{default_tree, ChangeLog, UiState, INITIAL_VERSION};
use crate::store::{insertion_point, StateStore, DEFAULT_MAX_HISTORY};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::VecDeque;
use tracing::{info, warn};
use uitree_core::UiTree;

/// [`StateStore`] backed by concurrent maps
///
/// Check-and-write on a subject happens under that subject's shard lock.
#[derive(Debug)]
pub struct MemoryStateStore {
    states: DashMap<String, UiState>,
    history: DashMap<String, VecDeque<ChangeLog>>,
    max_history: usize,
}

impl MemoryStateStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: DashMap::new(),
            history: DashMap::new(),
            max_history: DEFAULT_MAX_HISTORY,
        }
    }

    /// Set history cap
    #[must_use]
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Number of subjects with state
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if no subject has state
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self, subject: &str) -> Result<Option<UiState>, StoreError> {
        Ok(self.states.get(subject).map(|s| s.value().clone()))
    }

    async fn initialize(&self, subject: &str) -> Result<UiState, StoreError> {
        check_subject(subject)?;
        let state = self
            .states
            .entry(subject.to_string())
            .or_insert_with(|| {
                info!(subject, "initialized UI state");
                UiState::initial(subject)
            })
            .value()
            .clone();
        Ok(state)
    }

    async fn save(
        &self,
        subject: &str,
        expected_version: u64,
        tree: UiTree,
    ) -> Result<UiState, StoreError> {
        match self.states.entry(subject.to_string()) {
            Entry::Vacant(_) => Err(StoreError::NotFound(subject.to_string())),
            Entry::Occupied(mut occupied) => {
                let current = occupied.get();
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
                occupied.insert(next.clone());
                info!(subject, version = next.version, "saved UI state");
                Ok(next)
            }
        }
    }

    async fn reset(&self, subject: &str) -> Result<UiState, StoreError> {
        check_subject(subject)?;
        let state = match self.states.entry(subject.to_string()) {
            Entry::Occupied(mut occupied) => {
                let next = occupied.get().next(default_tree());
                occupied.insert(next.clone());
                next
            }
            Entry::Vacant(vacant) => vacant
                .insert(UiState::new(subject, INITIAL_VERSION, default_tree()))
                .value()
                .clone(),
        };
        info!(subject, version = state.version, "reset UI state");
        Ok(state)
    }

    async fn record_change(&self, subject: &str, entry: ChangeLog) -> Result<(), StoreError> {
        let mut log = self.history.entry(subject.to_string()).or_default();
        let at = insertion_point(log.iter(), &entry).unwrap_or(log.len());
        log.insert(at, entry);
        log.truncate(self.max_history);
        Ok(())
    }

    async fn history(&self, subject: &str, limit: usize) -> Result<Vec<ChangeLog>, StoreError> {
        Ok(self
            .history
            .get(subject)
            .map(|log| log.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
