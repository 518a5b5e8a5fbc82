//! Persisted state records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use uitree_core::UiTree;

/// Version assigned to a freshly initialized subject
pub const INITIAL_VERSION: u64 = 1;

/// Default `triggeredBy` for changes made through `modify_ui`
pub const DEFAULT_TRIGGER: &str = "modify_ui";

/// Tree every new subject starts with
#[must_use]
pub fn default_tree() -> UiTree {
    UiTree::new("TodoApp")
        .with_prop("title", "My Tasks")
        .with_children(vec![
            UiTree::new("TaskInput").with_prop("placeholder", "What needs to be done?"),
            UiTree::new("TaskList")
                .with_prop("filter", "all")
                .with_children(vec![]),
        ])
}

/// Current UI state of one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// Optimistic-lock version, starts at 1
    pub version: u64,
    /// Owning subject
    pub user_id: String,
    /// Current tree
    pub tree: UiTree,
    /// Time of the last write
    pub last_modified: DateTime<Utc>,
}

impl UiState {
    /// Create state at an explicit version, stamped now
    #[must_use]
    pub fn new(user_id: impl Into<String>, version: u64, tree: UiTree) -> Self {
        Self {
            version,
            user_id: user_id.into(),
            tree,
            last_modified: Utc::now(),
        }
    }

    /// Fresh version-1 state with the default tree
    #[must_use]
    pub fn initial(user_id: impl Into<String>) -> Self {
        Self::new(user_id, INITIAL_VERSION, default_tree())
    }

    /// Successor record holding `tree` at `version + 1`
    #[must_use]
    pub fn next(&self, tree: UiTree) -> Self {
        Self::new(self.user_id.clone(), self.version + 1, tree)
    }
}

/// One recorded UI modification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLog {
    /// Unique id (ULID)
    pub id: String,
    /// State version this change produced; 0 when not tied to a save
    #[serde(default)]
    pub version: u64,
    /// When the change was made
    pub timestamp: DateTime<Utc>,
    /// What changed
    pub description: String,
    /// Tree before the change
    pub before_tree: UiTree,
    /// Tree after the change
    pub after_tree: UiTree,
    /// What caused the change (tool name or chat message id)
    pub triggered_by: String,
}

impl ChangeLog {
    /// Create entry with a new id and the current time
    #[must_use]
    pub fn new(description: impl Into<String>, before_tree: UiTree, after_tree: UiTree) -> Self {
        Self {
            id: Ulid::new().to_string(),
            version: 0,
            timestamp: Utc::now(),
            description: description.into(),
            before_tree,
            after_tree,
            triggered_by: DEFAULT_TRIGGER.to_string(),
        }
    }

    /// Set the version produced by this change
    #[inline]
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Set trigger
    #[inline]
    #[must_use]
    pub fn with_triggered_by(mut self, triggered_by: impl Into<String>) -> Self {
        self.triggered_by = triggered_by.into();
        self
    }
}
