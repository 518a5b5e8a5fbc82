//! Error taxonomy surfaced by the tool operations
//!
//! Every failure maps onto one of three domain kinds (not found, validation,
//! version conflict) or an internal storage failure. Each carries a message
//! and, where one helps, a remediation suggestion.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::{self, Display, Formatter};
use uitree_core::{PatchError, ValidationReport};
use uitree_store::StoreError;

/// JSON-RPC error codes
pub mod codes {
    /// Malformed JSON
    pub const PARSE_ERROR: i64 = -32700;
    /// Not a JSON-RPC request object
    pub const INVALID_REQUEST: i64 = -32600;
    /// Unknown method
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Bad arguments, including failed patches
    pub const INVALID_PARAMS: i64 = -32602;
    /// Storage or other unexpected failure
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Subject or component does not exist
    pub const NOT_FOUND: i64 = -32000;
    /// Patched tree failed validation
    pub const INVALID_TREE: i64 = -32001;
    /// Stale version
    pub const VERSION_CONFLICT: i64 = -32002;
}

/// Machine-readable error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Referenced subject or component does not exist
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    /// Malformed or structurally invalid input
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    /// Optimistic-concurrency check failed
    #[serde(rename = "VERSION_CONFLICT")]
    VersionConflict,
    /// Storage failure
    #[serde(rename = "INTERNAL_ERROR")]
    Internal,
}

impl ErrorKind {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION_ERROR",
            Self::VersionConflict => "VERSION_CONFLICT",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a tool operation
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Subject or component absent
    #[error("{resource} with id '{id}' not found")]
    NotFound {
        /// Kind of thing looked up, e.g. `User`
        resource: &'static str,
        /// Id that was looked up
        id: String,
    },

    /// Malformed arguments
    #[error("{0}")]
    Validation(String),

    /// Patch could not be applied
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Patched tree failed structural validation
    #[error("resulting tree is invalid: {}", .0.summary())]
    InvalidTree(ValidationReport),

    /// Caller's version is stale
    #[error("Version conflict: expected {expected}, got {actual}")]
    VersionConflict {
        /// Version the caller observed
        expected: u64,
        /// Version currently persisted
        actual: u64,
    },

    /// Storage failure
    #[error("storage error: {0}")]
    Storage(#[source] StoreError),
}

impl ToolError {
    /// Subject not found
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "User",
            id: id.into(),
        }
    }

    /// Component not registered
    pub fn component_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "Component",
            id: name.into(),
        }
    }

    /// Error kind
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) | Self::Patch(_) | Self::InvalidTree(_) => ErrorKind::Validation,
            Self::VersionConflict { .. } => ErrorKind::VersionConflict,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }

    /// How the caller can recover, if there is a known way
    #[must_use]
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NotFound { resource, .. } => Some(format!(
                "Check that the {} exists and the ID is correct",
                resource.to_lowercase()
            )),
            Self::VersionConflict { .. } => {
                Some("Refresh to get the latest state and try again".to_string())
            }
            Self::InvalidTree(report) => report.errors.iter().find_map(|e| e.suggestion.clone()),
            Self::Validation(_) | Self::Patch(_) | Self::Storage(_) => None,
        }
    }

    /// JSON-RPC error code
    #[must_use]
    pub fn rpc_code(&self) -> i64 {
        match self {
            Self::NotFound { .. } => codes::NOT_FOUND,
            Self::InvalidTree(_) => codes::INVALID_TREE,
            Self::Validation(_) | Self::Patch(_) => codes::INVALID_PARAMS,
            Self::VersionConflict { .. } => codes::VERSION_CONFLICT,
            Self::Storage(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Structured form: `{code, message, suggestion?}` plus conflict or
    /// validation detail
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "code": self.kind().as_str(),
            "message": self.to_string(),
        });
        if let Some(suggestion) = self.suggestion() {
            body["suggestion"] = Value::String(suggestion);
        }
        match self {
            Self::VersionConflict { expected, actual } => {
                body["providedVersion"] = json!(expected);
                body["currentVersion"] = json!(actual);
            }
            Self::InvalidTree(report) => {
                body["errors"] = serde_json::to_value(&report.errors).unwrap_or(Value::Null);
            }
            _ => {}
        }
        body
    }
}

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::user_not_found(id),
            StoreError::VersionConflict { expected, actual } => {
                Self::VersionConflict { expected, actual }
            }
            StoreError::InvalidSubject(id) => Self::Validation(format!("invalid user id: '{id}'")),
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uitree_core::{OperationKind, Patch, PatchEngine, ComponentRegistry, UiTree};

    #[test]
    fn not_found_message_and_suggestion() {
        let err = ToolError::user_not_found("zoe");
        assert_eq!(err.to_string(), "User with id 'zoe' not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            err.suggestion().as_deref(),
            Some("Check that the user exists and the ID is correct")
        );
        assert_eq!(err.rpc_code(), codes::NOT_FOUND);
    }

    #[test]
    fn store_errors_map_to_domain_kinds() {
        let err: ToolError = StoreError::VersionConflict {
            expected: 3,
            actual: 4,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::VersionConflict);
        assert_eq!(err.to_string(), "Version conflict: expected 3, got 4");

        let json = err.to_json();
        assert_eq!(json["code"], "VERSION_CONFLICT");
        assert_eq!(json["providedVersion"], 3);
        assert_eq!(json["currentVersion"], 4);

        let err: ToolError = StoreError::NotFound("x".into()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: ToolError = StoreError::InvalidSubject("../x".into()).into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: ToolError = StoreError::io_error("/tmp/x", io).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.rpc_code(), codes::INTERNAL_ERROR);
    }

    #[test]
    fn patch_errors_are_validation() {
        let registry = ComponentRegistry::with_defaults();
        let patch =
            Patch::from_parts(OperationKind::Add, "$", Some(UiTree::new("UnknownWidget")), None)
                .unwrap();
        let err: ToolError = PatchEngine::new(&registry)
            .apply(&UiTree::new("TodoApp"), &patch)
            .unwrap_err()
            .into();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.rpc_code(), codes::INVALID_PARAMS);
        assert!(err.to_string().contains("UnknownWidget"));
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn kind_serializes_screaming_case() {
        assert_eq!(
            serde_json::to_value(ErrorKind::Validation).unwrap(),
            "VALIDATION_ERROR"
        );
    }
}
