//! Lab configuration loading and validation.
//!
//! # Responsibility
//! - Describe which storage backend to open and where photos live.
//! - Carry the optional rolling-log level and directory.
//! - Parse JSON config files into validated values.
//!
//! # Invariants
//! - A returned `LabConfig` has passed `validate()`.

use crate::logging::default_log_level;
use crate::store::StorageBackend;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Errors returned while loading or validating config.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Startup configuration for one crime lab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabConfig {
    pub storage: StorageBackend,
    /// Absolute directory holding `IMG_<uuid>.jpg` files.
    pub photo_dir: PathBuf,
    /// Optional override for `default_log_level()`.
    #[serde(default)]
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files. File logging stays off
    /// when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl LabConfig {
    pub fn in_memory(photo_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageBackend::Memory,
            photo_dir: photo_dir.into(),
            log_level: None,
            log_dir: None,
        }
    }

    pub fn sqlite(db_path: impl Into<PathBuf>, photo_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageBackend::Sqlite {
                path: db_path.into(),
            },
            photo_dir: photo_dir.into(),
            log_level: None,
            log_dir: None,
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Level to pass to `init_logging`.
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or_else(|| default_log_level())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.photo_dir.is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "photo_dir must be an absolute path, got `{}`",
                self.photo_dir.display()
            )));
        }
        if let Some(log_dir) = &self.log_dir {
            if !log_dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    log_dir.display()
                )));
            }
        }
        if let StorageBackend::Sqlite { path } = &self.storage {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "sqlite storage path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
