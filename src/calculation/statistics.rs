//! Worked-hours statistics and projected earnings.
//!
//! Statistics count entries rather than records: a date with two entries
//! contributes two shifts.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Position, ShiftRecord};

use super::YearMonth;

/// Length of the trailing reporting window, in months.
pub const TRAILING_MONTHS: usize = 3;

/// Aggregates for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// The month these figures cover.
    pub month: YearMonth,
    /// Sum of all entry durations.
    pub total_hours: Decimal,
    /// Number of entries.
    pub shift_count: u32,
    /// Hours per position; positions with no entries are absent.
    pub position_hours: BTreeMap<Position, Decimal>,
    /// `total_hours * hourly_rate`.
    pub earnings: Decimal,
}

/// Computes statistics for every entry dated in `month`.
///
/// A zero `hourly_rate` means the rate is not configured and yields zero
/// earnings.
///
/// # Example
///
/// ```
/// use shift_calendar::calculation::{monthly_stats, YearMonth};
/// use shift_calendar::models::{Position, ShiftEntry, ShiftRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let shift = ShiftRecord::single(
///     "s1",
///     NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
///     ShiftEntry::new("08:00 - 16:00".parse().unwrap(), Position::Kitchen),
///     "Main Street",
/// );
/// let stats = monthly_stats(&[shift], YearMonth::new(2026, 1).unwrap(), Decimal::from(20));
/// assert_eq!(stats.total_hours, Decimal::from(8));
/// assert_eq!(stats.earnings, Decimal::from(160));
/// ```
pub fn monthly_stats(records: &[ShiftRecord], month: YearMonth, hourly_rate: Decimal) -> MonthlyStats {
    let mut total_hours = Decimal::ZERO;
    let mut shift_count = 0u32;
    let mut position_hours: BTreeMap<Position, Decimal> = BTreeMap::new();

    for entry in records
        .iter()
        .filter(|r| month.contains(r.date))
        .flat_map(|r| r.entries.iter())
    {
        let hours = entry.time.hours();
        total_hours += hours;
        shift_count += 1;
        *position_hours.entry(entry.position).or_insert(Decimal::ZERO) += hours;
    }

    MonthlyStats {
        month,
        total_hours,
        shift_count,
        position_hours,
        earnings: total_hours * hourly_rate,
    }
}

/// Statistics for the current month and the months before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailingReport {
    /// Per-month figures, oldest first; the last element is the current month.
    pub months: Vec<MonthlyStats>,
    /// Hours summed over the window.
    pub total_hours: Decimal,
    /// Mean hours per month over the window.
    pub average_hours: Decimal,
    /// Entries summed over the window.
    pub total_shifts: u32,
    /// Earnings summed over the window.
    pub total_earnings: Decimal,
    /// Mean earnings per month over the window.
    pub average_earnings: Decimal,
}

impl TrailingReport {
    /// Figures for the most recent month of the window.
    pub fn current(&self) -> Option<&MonthlyStats> {
        self.months.last()
    }
}

/// Computes [`monthly_stats`] for `current` and the two preceding months.
pub fn trailing_report(
    records: &[ShiftRecord],
    current: YearMonth,
    hourly_rate: Decimal,
) -> TrailingReport {
    let months: Vec<MonthlyStats> = current
        .trailing(TRAILING_MONTHS)
        .into_iter()
        .map(|month| monthly_stats(records, month, hourly_rate))
        .collect();

    let total_hours: Decimal = months.iter().map(|m| m.total_hours).sum();
    let total_shifts: u32 = months.iter().map(|m| m.shift_count).sum();
    let total_earnings: Decimal = months.iter().map(|m| m.earnings).sum();
    let window = Decimal::from(months.len().max(1) as u64);

    TrailingReport {
        total_hours,
        average_hours: total_hours / window,
        total_shifts,
        total_earnings,
        average_earnings: total_earnings / window,
        months,
    }
}
