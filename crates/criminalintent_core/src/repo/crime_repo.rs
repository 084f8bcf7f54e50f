//! Crime repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `crimes` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Lookups of a missing id return `Ok(None)`, never an error.
//! - Update and delete of a missing id are silent no-ops.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::crime::{datetime_from_epoch_ms, Crime, CrimeId};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CRIME_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    date,
    solved,
    suspect,
    requires_police
FROM crimes";

const REQUIRED_COLUMNS: [&str; 6] = [
    "uuid",
    "title",
    "date",
    "solved",
    "suspect",
    "requires_police",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for crime persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    DuplicateId(CrimeId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

/// Coarse classification used by callers to pick a recovery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoErrorKind {
    /// Storage medium failed (disk full, read-only, permissions, I/O).
    /// There is no recovery path beyond surfacing it to the user.
    FatalIo,
    Conflict,
    InvalidData,
    Schema,
    Other,
}

impl RepoError {
    pub fn kind(&self) -> RepoErrorKind {
        match self {
            Self::Db(DbError::Io { .. }) => RepoErrorKind::FatalIo,
            Self::Db(DbError::Sqlite(err)) => classify_sqlite(err),
            Self::Db(DbError::UnsupportedSchemaVersion { .. }) => RepoErrorKind::Schema,
            Self::DuplicateId(_) => RepoErrorKind::Conflict,
            Self::InvalidData(_) => RepoErrorKind::InvalidData,
            Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => RepoErrorKind::Schema,
        }
    }

    pub fn is_fatal_io(&self) -> bool {
        self.kind() == RepoErrorKind::FatalIo
    }
}

fn classify_sqlite(err: &rusqlite::Error) -> RepoErrorKind {
    match err.sqlite_error_code() {
        Some(
            ErrorCode::DiskFull
            | ErrorCode::ReadOnly
            | ErrorCode::PermissionDenied
            | ErrorCode::CannotOpen
            | ErrorCode::SystemIoFailure,
        ) => RepoErrorKind::FatalIo,
        Some(ErrorCode::ConstraintViolation) => RepoErrorKind::Conflict,
        _ => RepoErrorKind::Other,
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "crime already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted crime data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateId(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface shared by every storage backend.
pub trait CrimeRepository {
    /// Inserts a new crime keyed by `crime.id`.
    fn add_crime(&self, crime: &Crime) -> RepoResult<CrimeId>;
    /// Returns every stored crime in insertion order.
    fn list_crimes(&self) -> RepoResult<Vec<Crime>>;
    /// Gets one crime; `Ok(None)` when the id is unknown.
    fn get_crime(&self, id: CrimeId) -> RepoResult<Option<Crime>>;
    /// Replaces stored fields; unknown ids are ignored.
    fn update_crime(&self, crime: &Crime) -> RepoResult<()>;
    /// Removes a crime; unknown ids are ignored.
    fn delete_crime(&self, id: CrimeId) -> RepoResult<()>;
    /// Number of stored crimes; always equals `list_crimes().len()`.
    fn crime_count(&self) -> RepoResult<usize>;
}

impl<R: CrimeRepository + ?Sized> CrimeRepository for &R {
    fn add_crime(&self, crime: &Crime) -> RepoResult<CrimeId> {
        (**self).add_crime(crime)
    }

    fn list_crimes(&self) -> RepoResult<Vec<Crime>> {
        (**self).list_crimes()
    }

    fn get_crime(&self, id: CrimeId) -> RepoResult<Option<Crime>> {
        (**self).get_crime(id)
    }

    fn update_crime(&self, crime: &Crime) -> RepoResult<()> {
        (**self).update_crime(crime)
    }

    fn delete_crime(&self, id: CrimeId) -> RepoResult<()> {
        (**self).delete_crime(id)
    }

    fn crime_count(&self) -> RepoResult<usize> {
        (**self).crime_count()
    }
}

/// SQLite-backed crime repository.
pub struct SqliteCrimeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCrimeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_crime_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Wraps a connection already known to be migrated.
    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CrimeRepository for SqliteCrimeRepository<'_> {
    fn add_crime(&self, crime: &Crime) -> RepoResult<CrimeId> {
        let inserted = self.conn.execute(
            "INSERT INTO crimes (
                uuid,
                title,
                date,
                solved,
                suspect,
                requires_police
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                crime.id.to_string(),
                crime.title.as_deref(),
                crime.occurred_at_epoch_ms(),
                bool_to_int(crime.solved),
                crime.suspect.as_deref(),
                bool_to_int(crime.requires_police),
            ],
        );

        match inserted {
            Ok(_) => Ok(crime.id),
            Err(err) if is_primary_key_violation(&err) => Err(RepoError::DuplicateId(crime.id)),
            Err(err) => Err(err.into()),
        }
    }

    fn list_crimes(&self) -> RepoResult<Vec<Crime>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CRIME_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut crimes = Vec::new();

        while let Some(row) = rows.next()? {
            crimes.push(parse_crime_row(row)?);
        }

        Ok(crimes)
    }

    fn get_crime(&self, id: CrimeId) -> RepoResult<Option<Crime>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CRIME_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_crime_row(row)?));
        }

        Ok(None)
    }

    fn update_crime(&self, crime: &Crime) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE crimes
             SET
                title = ?1,
                date = ?2,
                solved = ?3,
                suspect = ?4,
                requires_police = ?5
             WHERE uuid = ?6;",
            params![
                crime.title.as_deref(),
                crime.occurred_at_epoch_ms(),
                bool_to_int(crime.solved),
                crime.suspect.as_deref(),
                bool_to_int(crime.requires_police),
                crime.id.to_string(),
            ],
        )?;

        Ok(())
    }

    fn delete_crime(&self, id: CrimeId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM crimes WHERE uuid = ?1;", [id.to_string()])?;
        Ok(())
    }

    fn crime_count(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM crimes;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative crime count `{count}`")))
    }
}

fn parse_crime_row(row: &Row<'_>) -> RepoResult<Crime> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in crimes.uuid"))
    })?;
    if id.is_nil() {
        return Err(RepoError::InvalidData(
            "nil uuid in crimes.uuid".to_string(),
        ));
    }

    let date_ms: i64 = row.get("date")?;
    let occurred_at = datetime_from_epoch_ms(date_ms).ok_or_else(|| {
        RepoError::InvalidData(format!("out of range timestamp `{date_ms}` in crimes.date"))
    })?;

    Ok(Crime {
        id,
        title: row.get("title")?,
        occurred_at,
        solved: parse_flag(row.get("solved")?, "crimes.solved")?,
        requires_police: parse_flag(row.get("requires_police")?, "crimes.requires_police")?,
        suspect: row.get("suspect")?,
    })
}

fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn ensure_crime_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "crimes")? {
        return Err(RepoError::MissingRequiredTable("crimes"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "crimes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "crimes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
