//! Service configuration
//!
//! Precedence, lowest first: built-in defaults, TOML file, environment
//! (`UITREE_DATA_DIR`, `UITREE_VALIDATE_AFTER_PATCH`), command-line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`ServiceConfig::data_dir`]
pub const ENV_DATA_DIR: &str = "UITREE_DATA_DIR";

/// Environment variable overriding [`ServiceConfig::validate_after_patch`]
pub const ENV_VALIDATE_AFTER_PATCH: &str = "UITREE_VALIDATE_AFTER_PATCH";

/// Tool service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Root of the file store
    pub data_dir: PathBuf,
    /// Subjects created by `init`
    pub seed_subjects: Vec<String>,
    /// Reject patches whose result fails tree validation
    pub validate_after_patch: bool,
    /// History entries returned when no limit is given
    pub history_limit: usize,
    /// History entries kept per subject
    pub max_history: usize,
    /// Buffer size of the `ui/changed` broadcast channel
    pub notification_capacity: usize,
}

impl ServiceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// With seed subjects
    #[must_use]
    pub fn with_seed_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seed_subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    /// With post-patch validation
    #[inline]
    #[must_use]
    pub fn with_validate_after_patch(mut self, enabled: bool) -> Self {
        self.validate_after_patch = enabled;
        self
    }

    /// With default history page size
    #[inline]
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// With history cap
    #[inline]
    #[must_use]
    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history = max;
        self
    }

    /// Parse from TOML text; missing keys keep their defaults
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed TOML or wrongly typed keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, or a parse error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    /// [`ConfigError::InvalidEnv`] if a boolean variable is not a boolean.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// # Errors
    /// Same as [`ServiceConfig::apply_env`].
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_VALIDATE_AFTER_PATCH) {
            self.validate_after_patch = parse_bool(&raw).ok_or_else(|| ConfigError::InvalidEnv {
                key: ENV_VALIDATE_AFTER_PATCH,
                value: raw,
            })?;
        }
        Ok(self)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            seed_subjects: vec!["default".into(), "alice".into(), "bob".into()],
            validate_after_patch: false,
            history_limit: 20,
            max_history: uitree_store::DEFAULT_MAX_HISTORY,
            notification_capacity: 64,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("io error reading {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment variable has an unusable value
    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServiceConfig::new();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.seed_subjects, vec!["default", "alice", "bob"]);
        assert!(!config.validate_after_patch);
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.max_history, 100);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ServiceConfig::from_toml_str(
            r#"
            data_dir = "/var/lib/uitree"
            validate_after_patch = true
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/uitree"));
        assert!(config.validate_after_patch);
        assert_eq!(config.history_limit, 20);
    }

    #[test]
    fn bad_toml_is_rejected() {
        let err = ServiceConfig::from_toml_str("history_limit = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides() {
        let config = ServiceConfig::new()
            .apply_env_from(|key| match key {
                ENV_DATA_DIR => Some("/tmp/ui".to_string()),
                ENV_VALIDATE_AFTER_PATCH => Some("yes".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/ui"));
        assert!(config.validate_after_patch);
    }

    #[test]
    fn env_rejects_bad_bool() {
        let err = ServiceConfig::new()
            .apply_env_from(|key| (key == ENV_VALIDATE_AFTER_PATCH).then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn builders() {
        let config = ServiceConfig::new()
            .with_data_dir("x")
            .with_seed_subjects(["solo"])
            .with_history_limit(5)
            .with_max_history(10)
            .with_validate_after_patch(true);
        assert_eq!(config.seed_subjects, vec!["solo"]);
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.max_history, 10);
    }
}
