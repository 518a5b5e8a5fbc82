//! Request and response payloads of the tool operations
//!
//! Field names follow the camelCase wire format.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uitree_core::{OperationKind, PropMap, UiTree};
use uitree_store::ChangeLog;

/// Arguments of `get_current_tree` and the other per-subject reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParams {
    /// Subject id
    pub user_id: String,
}

/// Arguments of `get_component_details`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentParams {
    /// Registered component name
    pub component_name: String,
}

/// Arguments of `validate_tree`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateTreeParams {
    /// Tree to check; kept untyped so malformed nodes are reported
    pub tree: Value,
}

/// Arguments of `modify_ui`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyRequest {
    /// Target subject
    pub user_id: String,
    /// Edit to perform
    pub operation: OperationKind,
    /// Location expression, e.g. `$.children[0]`
    pub path: String,
    /// Fragment for add and replace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<UiTree>,
    /// Props for update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<PropMap>,
    /// Version the caller observed; defaults to the version loaded by the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
    /// Recorded in the change log; defaults to `modify_ui`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<String>,
}

impl ModifyRequest {
    /// Create request without payload
    #[must_use]
    pub fn new(user_id: impl Into<String>, operation: OperationKind, path: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            operation,
            path: path.into(),
            component: None,
            props: None,
            expected_version: None,
            triggered_by: None,
        }
    }

    /// Add-or-replace request
    #[must_use]
    pub fn with_component(mut self, component: UiTree) -> Self {
        self.component = Some(component);
        self
    }

    /// Update request
    #[must_use]
    pub fn with_props(mut self, props: PropMap) -> Self {
        self.props = Some(props);
        self
    }

    /// Pin the version this edit is based on
    #[must_use]
    pub fn with_expected_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    /// Set change log trigger
    #[must_use]
    pub fn with_triggered_by(mut self, triggered_by: impl Into<String>) -> Self {
        self.triggered_by = Some(triggered_by.into());
        self
    }
}

/// Result of a successful `modify_ui`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyResult {
    /// Always `true`; failures are errors
    pub success: bool,
    /// Tree after the edit
    pub new_tree: UiTree,
    /// What changed
    pub description: String,
    /// Newly persisted version
    pub version: u64,
}

/// Arguments of `update_state`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStateRequest {
    /// Target subject
    pub user_id: String,
    /// Version the caller observed
    pub version: u64,
    /// Replacement tree
    pub tree: UiTree,
}

/// Result of `get_history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    /// Subject id
    pub user_id: String,
    /// Entries, newest first
    pub changes: Vec<ChangeLog>,
    /// Number of entries returned
    pub total: usize,
}

/// Payload of the `ui/changed` notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiChanged {
    /// Subject whose tree changed
    pub user_id: String,
    /// The successful modification
    pub result: ModifyResult,
}
