//! Shift model and related types.
//!
//! A [`ShiftRecord`] is one calendar date's worth of work: a date, the
//! entries worked that day and where. Day-of-week and day-of-month are
//! always derived from the date, never stored.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::hours_between;
use crate::error::{ScheduleError, ScheduleResult};

use super::Position;

/// A pair of times of day.
///
/// `end` earlier than `start` means the range crosses midnight.
///
/// # Examples
///
/// ```
/// use shift_calendar::models::TimeRange;
/// use rust_decimal::Decimal;
///
/// let range: TimeRange = "22:00 - 06:00".parse().unwrap();
/// assert!(range.is_overnight());
/// assert_eq!(range.hours(), Decimal::from(8));
/// assert_eq!(range.to_string(), "22:00 - 06:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeRange {
    /// Start time of day.
    pub start: NaiveTime,
    /// End time of day.
    pub end: NaiveTime,
}

impl TimeRange {
    /// Creates a range from two times of day.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Creates a range from hour/minute pairs, or `None` if either is out of range.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0)?,
            end: NaiveTime::from_hms_opt(end.0, end.1, 0)?,
        })
    }

    /// Returns true when the range ends on the following day.
    pub fn is_overnight(&self) -> bool {
        self.end < self.start
    }

    /// Duration of the range in hours, adding a day for overnight ranges.
    pub fn hours(&self) -> Decimal {
        hours_between(self.start, self.end)
    }

    /// Anchors the range on a date, returning start and end date-times.
    ///
    /// The end falls on the next day for overnight ranges.
    pub fn on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = date.and_time(self.start);
        let end_date = if self.is_overnight() {
            date.succ_opt().unwrap_or(date)
        } else {
            date
        };
        (start, end_date.and_time(self.end))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

impl FromStr for TimeRange {
    type Err = ScheduleError;

    /// Parses `"HH:MM - HH:MM"`; spaces around the dash are optional.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTimeRange {
            value: value.to_string(),
        };

        let (start, end) = value.split_once('-').ok_or_else(invalid)?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").map_err(|_| invalid())?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").map_err(|_| invalid())?;

        Ok(Self { start, end })
    }
}

impl TryFrom<String> for TimeRange {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.to_string()
    }
}

/// Checks a caller-supplied record or preference id.
///
/// Ids end up in calendar `UID` lines, so they must be non-empty and free of
/// control characters.
///
/// ```
/// use shift_calendar::models::validate_id;
///
/// assert!(validate_id("shift-1").is_ok());
/// assert!(validate_id("x\nSUMMARY:LOB").is_err());
/// assert!(validate_id("  ").is_err());
/// ```
pub fn validate_id(id: &str) -> ScheduleResult<()> {
    let invalid = |message: &str| ScheduleError::InvalidId {
        id: id.to_string(),
        message: message.to_string(),
    };
    if id.trim().is_empty() {
        return Err(invalid("must not be empty"));
    }
    if id.chars().any(char::is_control) {
        return Err(invalid("control characters are not allowed"));
    }
    Ok(())
}

/// A single block of work on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftEntry {
    /// When the work happens.
    pub time: TimeRange,
    /// Where the work happens.
    pub position: Position,
}

impl ShiftEntry {
    /// Creates an entry.
    pub fn new(time: TimeRange, position: Position) -> Self {
        Self { time, position }
    }

    /// Display color, derived from the position.
    pub fn color(&self) -> &'static str {
        self.position.color()
    }
}

/// All work scheduled on one calendar date.
///
/// # Examples
///
/// ```
/// use shift_calendar::models::{Position, ShiftEntry, ShiftRecord, TimeRange};
/// use chrono::{NaiveDate, Weekday};
///
/// let record = ShiftRecord::single(
///     "shift-1",
///     NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     ShiftEntry::new("08:00 - 16:00".parse().unwrap(), Position::Kitchen),
///     "Main Street",
/// );
/// assert_eq!(record.day_of_week(), Weekday::Thu);
/// assert_eq!(record.day_number(), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Identifier, unique within a store.
    pub id: String,
    /// The calendar date; the store's merge key.
    pub date: NaiveDate,
    /// Work blocks on this date. Only the first survives calendar generation.
    pub entries: Vec<ShiftEntry>,
    /// Free-text location.
    pub location: String,
}

impl ShiftRecord {
    /// Creates a record holding exactly one entry.
    pub fn single(
        id: impl Into<String>,
        date: NaiveDate,
        entry: ShiftEntry,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            entries: vec![entry],
            location: location.into(),
        }
    }

    /// Day of the week, derived from the date.
    pub fn day_of_week(&self) -> Weekday {
        self.date.weekday()
    }

    /// Day of the month, derived from the date.
    pub fn day_number(&self) -> u32 {
        self.date.day()
    }

    /// The entry written to calendar documents.
    pub fn first_entry(&self) -> Option<&ShiftEntry> {
        self.entries.first()
    }

    /// Start of the first entry, if any.
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        self.first_entry().map(|e| self.date.and_time(e.time.start))
    }
}
