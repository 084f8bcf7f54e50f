//! Crime use-case service.
//!
//! # Responsibility
//! - Provide the entry points list/detail/pager screens call.
//! - Delegate persistence to an injected repository.
//!
//! # Invariants
//! - Service APIs never bypass repository contracts.
//! - Service layer remains storage-agnostic.

use crate::model::crime::{Crime, CrimeId};
use crate::repo::crime_repo::{CrimeRepository, RepoResult};
use log::debug;

/// Use-case service over one crime repository.
pub struct CrimeLab<R: CrimeRepository> {
    repo: R,
}

impl<R: CrimeRepository> CrimeLab<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates a fresh crime and persists it immediately.
    ///
    /// # Contract
    /// - New id, `occurred_at = now`, unsolved, no title/suspect.
    /// - Returns the stored value so the caller can open its detail view.
    pub fn new_crime(&self) -> RepoResult<Crime> {
        let crime = Crime::new();
        self.repo.add_crime(&crime)?;
        debug!(
            "event=crime_new module=service status=ok crime_id={}",
            crime.id
        );
        Ok(crime)
    }

    pub fn add_crime(&self, crime: &Crime) -> RepoResult<CrimeId> {
        let id = self.repo.add_crime(crime)?;
        debug!("event=crime_add module=service status=ok crime_id={id}");
        Ok(id)
    }

    /// Lists every crime in storage order.
    pub fn crimes(&self) -> RepoResult<Vec<Crime>> {
        self.repo.list_crimes()
    }

    /// Gets one crime by id; `Ok(None)` when absent.
    pub fn crime(&self, id: CrimeId) -> RepoResult<Option<Crime>> {
        self.repo.get_crime(id)
    }

    /// Writes back detail-screen edits. Unknown ids are ignored.
    pub fn update_crime(&self, crime: &Crime) -> RepoResult<()> {
        self.repo.update_crime(crime)?;
        debug!(
            "event=crime_update module=service status=ok crime_id={} solved={}",
            crime.id, crime.solved
        );
        Ok(())
    }

    /// Deletes a crime. Repeated deletes are no-ops.
    pub fn delete_crime(&self, id: CrimeId) -> RepoResult<()> {
        self.repo.delete_crime(id)?;
        debug!("event=crime_delete module=service status=ok crime_id={id}");
        Ok(())
    }

    /// Number of crimes, as shown in the list subtitle.
    pub fn crime_count(&self) -> RepoResult<usize> {
        self.repo.crime_count()
    }

    /// Index of `id` in listing order; the pager opens at this page.
    pub fn crime_position(&self, id: CrimeId) -> RepoResult<Option<usize>> {
        Ok(self
            .repo
            .list_crimes()?
            .iter()
            .position(|crime| crime.id == id))
    }

    /// Pager "jump to first" target; `None` when the list is empty.
    pub fn first_position(&self) -> RepoResult<Option<usize>> {
        Ok(match self.repo.crime_count()? {
            0 => None,
            _ => Some(0),
        })
    }

    /// Pager "jump to last" target; `None` when the list is empty.
    pub fn last_position(&self) -> RepoResult<Option<usize>> {
        Ok(self.repo.crime_count()?.checked_sub(1))
    }
}
