//! Process-wide crime lab for hosts that want one shared instance.
//!
//! # Responsibility
//! - Open the configured store exactly once per process.
//! - Start rolling file logs first when the config names a log directory.
//! - Serialize access from any thread.
//!
//! # Invariants
//! - The first successful `init_shared_lab` wins; later configs are ignored.
//! - A failed initialization leaves the slot empty so a later call may retry.

use crate::config::{ConfigError, LabConfig};
use crate::db::DbError;
use crate::logging::{init_logging, LoggingError};
use crate::photo::PhotoStore;
use crate::service::crime_lab::CrimeLab;
use crate::store::CrimeStore;
use log::{info, warn};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static SHARED_LAB: OnceCell<SharedLab> = OnceCell::new();

#[derive(Debug)]
pub enum LabInitError {
    Config(ConfigError),
    Logging(LoggingError),
    Db(DbError),
}

impl Display for LabInitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "failed to open crime store: {err}"),
        }
    }
}

impl Error for LabInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ConfigError> for LabInitError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for LabInitError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for LabInitError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Mutex-guarded lab plus the config it was opened from.
pub struct SharedLab {
    lab: Mutex<CrimeLab<CrimeStore>>,
    photos: PhotoStore,
    config: LabConfig,
}

impl SharedLab {
    /// Runs `op` with exclusive access to the lab.
    pub fn with<T>(&self, op: impl FnOnce(&CrimeLab<CrimeStore>) -> T) -> T {
        let lab = self.lab.lock();
        op(&lab)
    }

    pub fn photo_store(&self) -> &PhotoStore {
        &self.photos
    }

    /// Config that won the first initialization.
    pub fn config(&self) -> &LabConfig {
        &self.config
    }
}

/// Returns the shared lab, opening it from `config` on first use.
pub fn init_shared_lab(config: &LabConfig) -> Result<&'static SharedLab, LabInitError> {
    if let Some(existing) = SHARED_LAB.get() {
        if existing.config() != config {
            warn!("event=shared_lab_init module=service status=ignored reason=already_initialized");
        }
        return Ok(existing);
    }

    SHARED_LAB.get_or_try_init(|| -> Result<SharedLab, LabInitError> {
        config.validate()?;
        if let Some(log_dir) = &config.log_dir {
            init_logging(config.effective_log_level(), log_dir)?;
        }
        let store = CrimeStore::open(&config.storage)?;
        info!(
            "event=shared_lab_init module=service status=ok backend={}",
            store.backend_name()
        );
        Ok(SharedLab {
            lab: Mutex::new(CrimeLab::new(store)),
            photos: PhotoStore::new(config.photo_dir.clone()),
            config: config.clone(),
        })
    })
}

/// Returns the shared lab if it has been initialized.
pub fn shared_lab() -> Option<&'static SharedLab> {
    SHARED_LAB.get()
}
