//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one data access contract for crimes.
//! - Provide the in-memory and SQLite strategies behind it.
//!
//! # Invariants
//! - Both backends return identical results for identical call sequences.
//! - Absence is reported as `Ok(None)` / no-op, never as an error.

pub mod crime_repo;
pub mod memory_repo;
