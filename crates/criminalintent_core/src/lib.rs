//! Core domain logic for CriminalIntent.
//! This crate owns the crime record store that every screen reads and writes.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod photo;
pub mod picture;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, LabConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::crime::{format_crime_date, Crime, CrimeId, CrimeValidationError};
pub use photo::{photo_file_name, PhotoStore};
pub use picture::{load_scaled, sample_size, PictureError, ScaledPicture};
pub use repo::crime_repo::{
    CrimeRepository, RepoError, RepoErrorKind, RepoResult, SqliteCrimeRepository,
};
pub use repo::memory_repo::InMemoryCrimeRepository;
pub use service::crime_lab::CrimeLab;
pub use service::shared::{init_shared_lab, shared_lab, LabInitError, SharedLab};
pub use store::{CrimeStore, StorageBackend};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
