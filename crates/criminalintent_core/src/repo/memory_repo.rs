//! Insertion-ordered in-memory crime repository.
//!
//! # Responsibility
//! - Hold crimes for one process lifetime without touching disk.
//! - Honor the same contract as the SQLite backend.
//!
//! # Invariants
//! - `order` and `by_id` always hold exactly the same key set.
//! - Listing order is insertion order; updates keep a crime's position.

use crate::model::crime::{Crime, CrimeId};
use crate::repo::crime_repo::{CrimeRepository, RepoError, RepoResult};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct MemoryState {
    order: Vec<CrimeId>,
    by_id: HashMap<CrimeId, Crime>,
}

/// Process-local crime repository backed by an ordered map.
#[derive(Debug, Default)]
pub struct InMemoryCrimeRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryCrimeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CrimeRepository for InMemoryCrimeRepository {
    fn add_crime(&self, crime: &Crime) -> RepoResult<CrimeId> {
        let mut state = self.state.lock();
        if state.by_id.contains_key(&crime.id) {
            return Err(RepoError::DuplicateId(crime.id));
        }
        state.order.push(crime.id);
        state.by_id.insert(crime.id, crime.clone());
        Ok(crime.id)
    }

    fn list_crimes(&self) -> RepoResult<Vec<Crime>> {
        let state = self.state.lock();
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.by_id.get(id).cloned())
            .collect())
    }

    fn get_crime(&self, id: CrimeId) -> RepoResult<Option<Crime>> {
        Ok(self.state.lock().by_id.get(&id).cloned())
    }

    fn update_crime(&self, crime: &Crime) -> RepoResult<()> {
        if let Some(stored) = self.state.lock().by_id.get_mut(&crime.id) {
            *stored = crime.clone();
        }
        Ok(())
    }

    fn delete_crime(&self, id: CrimeId) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.by_id.remove(&id).is_some() {
            state.order.retain(|current| *current != id);
        }
        Ok(())
    }

    fn crime_count(&self) -> RepoResult<usize> {
        Ok(self.state.lock().by_id.len())
    }
}
