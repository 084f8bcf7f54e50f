//! Crime photo file convention.
//!
//! # Responsibility
//! - Derive the on-disk photo path for a crime from its id.
//! - Report missing photo files as "no photo".
//!
//! # Invariants
//! - Path derivation is deterministic and never touches the filesystem.
//! - Absence of a file is never an error.

use crate::model::crime::CrimeId;
use std::path::{Path, PathBuf};

/// File name the camera capture is written to for one crime.
pub fn photo_file_name(id: CrimeId) -> String {
    format!("IMG_{id}.jpg")
}

/// Directory-scoped view of crime photos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target path for a capture, whether or not it exists yet.
    pub fn photo_path(&self, id: CrimeId) -> PathBuf {
        self.dir.join(photo_file_name(id))
    }

    /// Path of an existing photo file, or `None` to render a placeholder.
    pub fn existing_photo(&self, id: CrimeId) -> Option<PathBuf> {
        let path = self.photo_path(id);
        path.is_file().then_some(path)
    }
}
