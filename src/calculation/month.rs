//! Month arithmetic and the month calendar grid.
//!
//! Months are 1-based throughout. Stepping backwards or forwards wraps the
//! month and carries into the year, including for negative offsets.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Position, ShiftRecord};

/// Number of cells in a month grid: six Monday-first weeks.
pub const GRID_CELLS: usize = 42;

/// Earliest year a [`YearMonth`] can hold.
pub const MIN_YEAR: i32 = 1;

/// Latest year a [`YearMonth`] can hold.
pub const MAX_YEAR: i32 = 9999;

/// A calendar month of a specific year.
///
/// Years are limited to [`MIN_YEAR`]..=[`MAX_YEAR`], so every month has a
/// first and last day and a full grid around it. Stepping outside that
/// range returns `None`.
///
/// # Example
///
/// ```
/// use shift_calendar::calculation::YearMonth;
///
/// let january = YearMonth::new(2026, 1).unwrap();
/// assert_eq!(january.offset(-1), YearMonth::new(2025, 12));
/// assert_eq!(january.offset(-13), YearMonth::new(2024, 12));
/// assert_eq!(january.offset(12), YearMonth::new(2027, 1));
/// assert_eq!(YearMonth::new(9999, 12).unwrap().next(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "MonthParts")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct MonthParts {
    year: i32,
    month: u32,
}

impl TryFrom<MonthParts> for YearMonth {
    type Error = String;

    fn try_from(parts: MonthParts) -> Result<Self, Self::Error> {
        YearMonth::new(parts.year, parts.month).ok_or_else(|| {
            format!(
                "invalid month {}-{}: year must be {}..={} and month 1..=12",
                parts.year, parts.month, MIN_YEAR, MAX_YEAR
            )
        })
    }
}

impl YearMonth {
    /// Creates a year-month, or `None` if the month is outside 1..=12 or
    /// the year outside [`MIN_YEAR`]..=[`MAX_YEAR`].
    pub fn new(year: i32, month: u32) -> Option<Self> {
        ((MIN_YEAR..=MAX_YEAR).contains(&year) && (1..=12).contains(&month))
            .then_some(Self { year, month })
    }

    /// The month a date falls in, or `None` for dates outside the supported
    /// years.
    pub fn of(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month())
    }

    /// Calendar year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Month, 1 through 12.
    pub fn month(self) -> u32 {
        self.month
    }

    /// Moves by `delta` months, carrying into the year.
    pub fn offset(self, delta: i32) -> Option<Self> {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(delta);
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        Self::new(year, index.rem_euclid(12) as u32 + 1)
    }

    /// The month before this one.
    pub fn previous(self) -> Option<Self> {
        self.offset(-1)
    }

    /// The month after this one.
    pub fn next(self) -> Option<Self> {
        self.offset(1)
    }

    /// The first day of the month.
    pub fn first_day(self) -> NaiveDate {
        // year and month are range-checked on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The last day of the month.
    pub fn last_day(self) -> NaiveDate {
        (28..=31)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))
            .unwrap_or_else(|| self.first_day())
    }

    /// Number of days in the month.
    pub fn days_in_month(self) -> u32 {
        self.last_day().day()
    }

    /// Returns true when `date` falls in this month.
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// This month and the `count - 1` months before it, oldest first.
    ///
    /// Months before [`MIN_YEAR`] are left out.
    ///
    /// ```
    /// use shift_calendar::calculation::YearMonth;
    ///
    /// let months = YearMonth::new(2026, 2).unwrap().trailing(3);
    /// let labels: Vec<String> = months.iter().map(|m| m.to_string()).collect();
    /// assert_eq!(labels, ["2025-12", "2026-01", "2026-02"]);
    /// ```
    pub fn trailing(self, count: usize) -> Vec<YearMonth> {
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        (0..count)
            .rev()
            .filter_map(|back| self.offset(-back))
            .collect()
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One day in a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    /// The date shown in the cell.
    pub date: NaiveDate,
    /// False for padding days from the neighbouring months.
    pub in_month: bool,
    /// Positions worked that day; always empty for padding days.
    pub positions: Vec<Position>,
}

/// Builds the 42-cell, Monday-first grid for a month.
///
/// Cells before the first and after the last day of the month are filled
/// from the neighbouring months and flagged with `in_month: false`.
pub fn month_grid(month: YearMonth, records: &[ShiftRecord]) -> Vec<GridCell> {
    let first = month.first_day();
    let leading = i64::from(first.weekday().num_days_from_monday());
    let grid_start = first
        .checked_sub_signed(Duration::days(leading))
        .unwrap_or(first);

    grid_start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| {
            let in_month = month.contains(date);
            let positions = if in_month {
                records
                    .iter()
                    .filter(|r| r.date == date)
                    .flat_map(|r| r.entries.iter().map(|e| e.position))
                    .collect()
            } else {
                Vec::new()
            };
            GridCell {
                date,
                in_month,
                positions,
            }
        })
        .collect()
}
