//! Error types for state stores

use std::path::PathBuf;

/// Errors from [`StateStore`](crate::StateStore) operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No state recorded for subject
    #[error("UI state with id '{0}' not found")]
    NotFound(String),

    /// Caller's version is stale
    #[error("Version conflict: expected {expected}, got {actual}")]
    VersionConflict {
        /// Version the caller observed
        expected: u64,
        /// Version currently persisted
        actual: u64,
    },

    /// Subject id cannot be used as a storage key
    #[error("invalid subject id: '{0}'")]
    InvalidSubject(String),

    /// IO error on a state or history file
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// State or history file holds malformed JSON
    #[error("corrupt data in {path}: {source}")]
    Corrupt {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Record could not be encoded
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create corrupt-data error for path
    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.into(),
            source,
        }
    }

    /// Check if this is a version conflict
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Reject ids that are empty or could escape the data directory
///
/// # Errors
/// [`StoreError::InvalidSubject`] for empty ids, `.`/`..`, or ids
/// containing path separators or NUL.
pub fn check_subject(subject: &str) -> Result<(), StoreError> {
    let bad = subject.is_empty()
        || subject == "."
        || subject == ".."
        || subject.contains(['/', '\\', '\0']);
    if bad {
        Err(StoreError::InvalidSubject(subject.to_string()))
    } else {
        Ok(())
    }
}
