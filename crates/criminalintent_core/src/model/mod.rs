//! Domain model for recorded crimes.
//!
//! # Responsibility
//! - Define the value types shared by repositories and services.
//!
//! # Invariants
//! - Every crime is identified by a stable `CrimeId`.
//! - Deletion is a hard delete owned by repositories, not a model flag.

pub mod crime;
