//! Crime schema history.
//!
//! Each step is a named SQL script applied in one transaction together with
//! every other pending step; `PRAGMA user_version` records the last one.
//!
//! # Invariants
//! - Steps are numbered 1, 2, 3, ... with no gaps.
//! - A database newer than this binary is never touched.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// One schema step for the `crimes` table.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "crimes",
        sql: include_str!("0001_crimes.sql"),
    },
    // Contact pick and the "requires police" flag arrived after the first
    // release; old rows read back with no suspect and the flag cleared.
    Migration {
        version: 2,
        name: "suspect",
        sql: include_str!("0002_suspect.sql"),
    },
];

/// Schema version written by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Steps still to run on a database currently at `from_version`.
pub fn pending_migrations(from_version: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > from_version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - Any SQL failure; the transaction is rolled back and the version kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let mut steps = pending_migrations(from_version).peekable();
    if steps.peek().is_none() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    let mut applied = 0_usize;
    for step in steps {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
        applied += 1;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} steps={}",
        from_version, latest, applied
    );
    Ok(())
}

/// Schema version recorded on the connection; 0 for a fresh file.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, pending_migrations, MIGRATIONS};

    #[test]
    fn versions_start_at_one_without_gaps() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version as usize, index + 1, "{}", migration.name);
        }
        assert_eq!(latest_version() as usize, MIGRATIONS.len());
    }

    #[test]
    fn pending_skips_applied_steps() {
        let names: Vec<&str> = pending_migrations(1).map(|step| step.name).collect();
        assert_eq!(names, ["suspect"]);
        assert_eq!(pending_migrations(0).count(), MIGRATIONS.len());
        assert_eq!(pending_migrations(latest_version()).count(), 0);
    }
}
