//! Runtime configuration for store locations and logging.
//!
//! # Responsibility
//! - Resolve where the metadata and content databases live.
//! - Carry logging level/directory for `init_logging`.
//!
//! # Invariants
//! - The two stores never share a database file.
//! - Missing configuration values fall back to documented defaults.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const METADATA_DB_FILE_NAME: &str = "journal_meta.sqlite3";
pub const CONTENT_DB_FILE_NAME: &str = "journal_content.sqlite3";

pub const ENV_DATA_DIR: &str = "JOURNAL_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "JOURNAL_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "JOURNAL_LOG_DIR";

const DEFAULT_DATA_DIR: &str = "journal-data";

/// Where one store keeps its database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

/// Locations of both stores handed to `PersistenceCoordinator::open`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub metadata_db: StoreLocation,
    pub content_db: StoreLocation,
}

impl StoreConfig {
    /// Both stores as files inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            metadata_db: StoreLocation::File(dir.join(METADATA_DB_FILE_NAME)),
            content_db: StoreLocation::File(dir.join(CONTENT_DB_FILE_NAME)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            metadata_db: StoreLocation::InMemory,
            content_db: StoreLocation::InMemory,
        }
    }

    /// Whether both stores point at the same database file.
    pub fn shares_file(&self) -> bool {
        match (&self.metadata_db, &self.content_db) {
            (StoreLocation::File(metadata), StoreLocation::File(content)) => {
                metadata == content
                    || matches!(
                        (metadata.canonicalize(), content.canonicalize()),
                        (Ok(left), Ok(right)) if left == right
                    )
            }
            _ => false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, cause: std::io::Error },
    Parse { path: PathBuf, cause: serde_json::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, cause } => {
                write!(f, "failed to read config `{}`: {cause}", path.display())
            }
            Self::Parse { path, cause } => {
                write!(f, "invalid config `{}`: {cause}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { cause, .. } => Some(cause),
            Self::Parse { cause, .. } => Some(cause),
        }
    }
}

/// Top-level journal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Directory holding both store databases.
    pub data_dir: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling logs; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl JournalConfig {
    /// Reads a JSON config file; absent keys take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|cause| ConfigError::Io {
            path: path.to_path_buf(),
            cause,
        })?;
        serde_json::from_str(&raw).map_err(|cause| ConfigError::Parse {
            path: path.to_path_buf(),
            cause,
        })
    }

    /// Builds a config from `JOURNAL_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = non_empty(lookup(ENV_DATA_DIR)) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = non_empty(lookup(ENV_LOG_LEVEL)) {
            config.log_level = level;
        }
        if let Some(dir) = non_empty(lookup(ENV_LOG_DIR)) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        config
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::in_dir(&self.data_dir)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{
        JournalConfig, StoreConfig, StoreLocation, CONTENT_DB_FILE_NAME, ENV_DATA_DIR,
        ENV_LOG_DIR, METADATA_DB_FILE_NAME,
    };
    use std::path::PathBuf;

    #[test]
    fn store_config_keeps_stores_in_separate_files() {
        let config = StoreConfig::in_dir("/tmp/journal");
        assert_eq!(
            config.metadata_db,
            StoreLocation::File(PathBuf::from("/tmp/journal").join(METADATA_DB_FILE_NAME))
        );
        assert_eq!(
            config.content_db,
            StoreLocation::File(PathBuf::from("/tmp/journal").join(CONTENT_DB_FILE_NAME))
        );
    }

    #[test]
    fn shares_file_detects_identical_locations() {
        assert!(!StoreConfig::in_dir("/tmp/journal").shares_file());
        assert!(!StoreConfig::in_memory().shares_file());

        let shared = StoreConfig {
            metadata_db: StoreLocation::File(PathBuf::from("/tmp/journal/one.sqlite3")),
            content_db: StoreLocation::File(PathBuf::from("/tmp/journal/one.sqlite3")),
        };
        assert!(shared.shares_file());
    }

    #[test]
    fn env_lookup_overrides_defaults_and_ignores_blanks() {
        let config = JournalConfig::from_lookup(|key| match key {
            ENV_DATA_DIR => Some("/data/journal".to_string()),
            ENV_LOG_DIR => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.data_dir, PathBuf::from("/data/journal"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, JournalConfig::default().log_level);
    }

    #[test]
    fn load_fills_missing_keys_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        std::fs::write(&path, r#"{"log_level":"warn"}"#).unwrap();

        let config = JournalConfig::load(&path).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.data_dir, JournalConfig::default().data_dir);
    }
}
