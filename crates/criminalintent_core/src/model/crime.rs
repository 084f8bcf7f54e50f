//! Crime domain model.
//!
//! # Responsibility
//! - Define the canonical record behind the list, detail and pager screens.
//! - Own date/time editing semantics for picker results.
//!
//! # Invariants
//! - `id` is stable, non-nil and never reused for another crime.
//! - `occurred_at` is one merged date+time value with millisecond precision,
//!   so a storage round trip compares equal.
//! - No field-level constraints: empty titles and any date are legal.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a crime. Sole external key in every backend.
pub type CrimeId = Uuid;

const DISPLAY_DATE_FORMAT: &str = "%A, %b %-d, %Y";

/// Validation failures for crime construction and edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrimeValidationError {
    NilUuid,
    InvalidTimeOfDay { hour: u32, minute: u32 },
}

impl Display for CrimeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "crime id must not be the nil uuid"),
            Self::InvalidTimeOfDay { hour, minute } => {
                write!(f, "invalid time of day {hour:02}:{minute:02}")
            }
        }
    }
}

impl Error for CrimeValidationError {}

/// One user-entered incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CrimeRecord")]
pub struct Crime {
    pub id: CrimeId,
    pub title: Option<String>,
    /// Merged calendar date and wall-clock time, serialized as epoch ms.
    /// Written only through the truncating setters.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub(crate) occurred_at: DateTime<Utc>,
    pub solved: bool,
    pub requires_police: bool,
    /// Display name of the chosen contact.
    pub suspect: Option<String>,
}

impl Crime {
    /// Creates a crime with a fresh random id, stamped with the current time.
    pub fn new() -> Self {
        Self::blank(Uuid::new_v4())
    }

    /// Creates a crime with a caller-provided id.
    ///
    /// Used by import paths where identity already exists.
    pub fn with_id(id: CrimeId) -> Result<Self, CrimeValidationError> {
        if id.is_nil() {
            return Err(CrimeValidationError::NilUuid);
        }
        Ok(Self::blank(id))
    }

    fn blank(id: CrimeId) -> Self {
        Self {
            id,
            title: None,
            occurred_at: truncate_to_millis(Utc::now()),
            solved: false,
            requires_police: false,
            suspect: None,
        }
    }

    /// Builder-style title setter.
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the calendar date, keeping the time of day.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.occurred_at = date.and_time(self.occurred_at.time()).and_utc();
    }

    /// Replaces hour and minute, keeping the calendar date.
    ///
    /// Seconds and sub-second parts are reset to zero.
    pub fn set_time_of_day(&mut self, hour: u32, minute: u32) -> Result<(), CrimeValidationError> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or(CrimeValidationError::InvalidTimeOfDay { hour, minute })?;
        self.occurred_at = self.occurred_at.date_naive().and_time(time).and_utc();
        Ok(())
    }

    /// Replaces the whole timestamp, dropping sub-millisecond precision.
    pub fn set_occurred_at(&mut self, value: DateTime<Utc>) {
        self.occurred_at = truncate_to_millis(value);
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn occurred_at_epoch_ms(&self) -> i64 {
        self.occurred_at.timestamp_millis()
    }

    /// Title for list rows; absent titles render as empty text.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Long-form date line, e.g. `Friday, Feb 13, 2026`.
    pub fn display_date(&self) -> String {
        format_crime_date(&self.occurred_at)
    }
}

impl Default for Crime {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a timestamp the way the detail screen shows it.
pub fn format_crime_date(value: &DateTime<Utc>) -> String {
    value.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Converts persisted epoch milliseconds back into a timestamp.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn datetime_from_epoch_ms(value: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(value)
}

fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    let millis_only = (value.nanosecond() / 1_000_000) * 1_000_000;
    value.with_nanosecond(millis_only).unwrap_or(value)
}

#[derive(Deserialize)]
struct CrimeRecord {
    id: CrimeId,
    title: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    occurred_at: DateTime<Utc>,
    solved: bool,
    #[serde(default)]
    requires_police: bool,
    suspect: Option<String>,
}

impl TryFrom<CrimeRecord> for Crime {
    type Error = CrimeValidationError;

    fn try_from(record: CrimeRecord) -> Result<Self, Self::Error> {
        if record.id.is_nil() {
            return Err(CrimeValidationError::NilUuid);
        }
        Ok(Self {
            id: record.id,
            title: record.title,
            occurred_at: record.occurred_at,
            solved: record.solved,
            requires_police: record.requires_police,
            suspect: record.suspect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_to_millis;
    use chrono::{TimeZone, Timelike, Utc};

    #[test]
    fn truncate_drops_sub_millisecond_part() {
        let value = Utc
            .with_ymd_and_hms(2024, 3, 1, 10, 0, 0)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        assert_eq!(truncate_to_millis(value).nanosecond(), 123_000_000);
    }
}
