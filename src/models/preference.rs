//! Shift preferences and the shifts they imply.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

use super::{Position, ShiftEntry, ShiftRecord, TimeRange, validate_id};

const DAY_START: (u32, u32) = (6, 0);
const DAY_END: (u32, u32) = (23, 0);
const STANDARD_START: (u32, u32) = (8, 0);
const STANDARD_END: (u32, u32) = (16, 0);

/// What the user asks for on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreferenceKind {
    /// Available for a standard 08:00-16:00 shift.
    Work,
    /// Not available at all.
    DayOff,
    /// Available only between two times.
    WorkBetween {
        /// Earliest start.
        from: NaiveTime,
        /// Latest end.
        to: NaiveTime,
    },
    /// Not available before a time.
    NotBefore {
        /// Earliest start.
        from: NaiveTime,
    },
    /// Not available after a time.
    NotAfter {
        /// Latest end.
        to: NaiveTime,
    },
}

impl PreferenceKind {
    /// The working hours this preference implies, if any.
    pub fn time_range(&self) -> Option<TimeRange> {
        let hm = |(h, m): (u32, u32)| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
        match *self {
            PreferenceKind::Work => Some(TimeRange::new(hm(STANDARD_START), hm(STANDARD_END))),
            PreferenceKind::DayOff => None,
            PreferenceKind::WorkBetween { from, to } => Some(TimeRange::new(from, to)),
            PreferenceKind::NotBefore { from } => Some(TimeRange::new(from, hm(DAY_END))),
            PreferenceKind::NotAfter { to } => Some(TimeRange::new(hm(DAY_START), to)),
        }
    }
}

/// A request about one date, kept in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPreference {
    /// Identifier.
    pub id: String,
    /// The date the preference applies to.
    pub date: NaiveDate,
    /// What is being asked for.
    #[serde(flatten)]
    pub kind: PreferenceKind,
    /// Requested position; required unless the kind is [`PreferenceKind::DayOff`].
    #[serde(default)]
    pub position: Option<Position>,
}

impl ShiftPreference {
    /// Checks the id and that the preference carries everything its kind
    /// needs.
    pub fn validate(&self) -> ScheduleResult<()> {
        validate_id(&self.id)?;
        if self.kind != PreferenceKind::DayOff && self.position.is_none() {
            return Err(ScheduleError::InvalidPreference {
                date: self.date,
                message: "a position is required".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the shift implied by this preference.
    ///
    /// Returns `None` for a day off.
    pub fn to_shift(&self, id: impl Into<String>, location: &str) -> Option<ShiftRecord> {
        let time = self.kind.time_range()?;
        let position = self.position.unwrap_or(Position::FALLBACK);
        Some(ShiftRecord::single(
            id,
            self.date,
            ShiftEntry::new(time, position),
            location,
        ))
    }
}
