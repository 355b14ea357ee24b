//! Vacation requests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Category of time off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationType {
    /// Paid annual leave.
    Annual,
    /// Short-notice leave taken on request.
    OnDemand,
    /// Unpaid leave.
    Unpaid,
    /// Medical leave.
    SickLeave,
    /// Anything else.
    Other,
}

impl std::fmt::Display for VacationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VacationType::Annual => write!(f, "Annual leave"),
            VacationType::OnDemand => write!(f, "Leave on demand"),
            VacationType::Unpaid => write!(f, "Unpaid leave"),
            VacationType::SickLeave => write!(f, "Sick leave"),
            VacationType::Other => write!(f, "Other"),
        }
    }
}

/// An inclusive range of days off.
///
/// Construct through [`VacationRecord::new`], which rejects inverted or
/// past ranges. Deserializing rejects inverted ranges as well; whether the
/// start has passed depends on the day the record is read, so that check
/// stays with `new`. The day count is always derived from the dates.
///
/// # Example
///
/// ```
/// use shift_calendar::models::{VacationRecord, VacationType};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
/// let vacation = VacationRecord::new(
///     NaiveDate::from_ymd_opt(2025, 12, 24).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 12, 26).unwrap(),
///     VacationType::Annual,
///     today,
/// )
/// .unwrap();
/// assert_eq!(vacation.total_days(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VacationParts")]
pub struct VacationRecord {
    start_date: NaiveDate,
    end_date: NaiveDate,
    kind: VacationType,
}

#[derive(Deserialize)]
struct VacationParts {
    start_date: NaiveDate,
    end_date: NaiveDate,
    kind: VacationType,
}

impl TryFrom<VacationParts> for VacationRecord {
    type Error = ScheduleError;

    fn try_from(parts: VacationParts) -> Result<Self, Self::Error> {
        check_range(parts.start_date, parts.end_date)?;
        Ok(Self {
            start_date: parts.start_date,
            end_date: parts.end_date,
            kind: parts.kind,
        })
    }
}

fn check_range(start: NaiveDate, end: NaiveDate) -> ScheduleResult<()> {
    if end < start {
        return Err(ScheduleError::InvalidVacation { start, end });
    }
    Ok(())
}

impl VacationRecord {
    /// Validates and creates a vacation starting no earlier than `today`.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        kind: VacationType,
        today: NaiveDate,
    ) -> ScheduleResult<Self> {
        check_range(start_date, end_date)?;
        if start_date < today {
            return Err(ScheduleError::DateInPast {
                date: start_date,
                today,
            });
        }

        Ok(Self {
            start_date,
            end_date,
            kind,
        })
    }

    /// First day off.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last day off, inclusive.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Vacation category.
    pub fn kind(&self) -> VacationType {
        self.kind
    }

    /// Number of days in the range, counting both ends.
    pub fn total_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Returns true once the last day has passed.
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }
}
