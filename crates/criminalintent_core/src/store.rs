//! Storage strategy selection.
//!
//! # Responsibility
//! - Turn a configured `StorageBackend` into one owned, ready repository.
//!
//! # Invariants
//! - Exactly one backend is active per store; they never share an id space.
//! - A SQLite store only exists for a connection with migrations applied.

use crate::db::{open_db, DbResult};
use crate::model::crime::{Crime, CrimeId};
use crate::repo::crime_repo::{CrimeRepository, RepoResult, SqliteCrimeRepository};
use crate::repo::memory_repo::InMemoryCrimeRepository;
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configured storage strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    Sqlite { path: PathBuf },
}

/// Owned repository chosen at construction time.
pub enum CrimeStore {
    Memory(InMemoryCrimeRepository),
    Sqlite(Connection),
}

impl CrimeStore {
    /// Opens the configured backend, running migrations for SQLite.
    pub fn open(backend: &StorageBackend) -> DbResult<Self> {
        let store = match backend {
            StorageBackend::Memory => Self::Memory(InMemoryCrimeRepository::new()),
            StorageBackend::Sqlite { path } => Self::Sqlite(open_db(path)?),
        };
        info!(
            "event=store_open module=store status=ok backend={}",
            store.backend_name()
        );
        Ok(store)
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Sqlite(_) => "sqlite",
        }
    }

    fn dispatch<T>(&self, op: impl FnOnce(&dyn CrimeRepository) -> RepoResult<T>) -> RepoResult<T> {
        match self {
            Self::Memory(repo) => op(repo),
            Self::Sqlite(conn) => op(&SqliteCrimeRepository::new_unchecked(conn)),
        }
    }
}

impl CrimeRepository for CrimeStore {
    fn add_crime(&self, crime: &Crime) -> RepoResult<CrimeId> {
        self.dispatch(|repo| repo.add_crime(crime))
    }

    fn list_crimes(&self) -> RepoResult<Vec<Crime>> {
        self.dispatch(|repo| repo.list_crimes())
    }

    fn get_crime(&self, id: CrimeId) -> RepoResult<Option<Crime>> {
        self.dispatch(|repo| repo.get_crime(id))
    }

    fn update_crime(&self, crime: &Crime) -> RepoResult<()> {
        self.dispatch(|repo| repo.update_crime(crime))
    }

    fn delete_crime(&self, id: CrimeId) -> RepoResult<()> {
        self.dispatch(|repo| repo.delete_crime(id))
    }

    fn crime_count(&self) -> RepoResult<usize> {
        self.dispatch(|repo| repo.crime_count())
    }
}
