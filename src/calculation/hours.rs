//! Hours between times of day.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::TimeRange;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Hours from `start` to `end`, wrapping past midnight when `end` is earlier.
///
/// Only hours and minutes are considered. Equal times give zero, not 24.
///
/// # Example
///
/// ```
/// use shift_calendar::calculation::hours_between;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
///
/// let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
/// assert_eq!(hours_between(t(8), t(16)), Decimal::from(8));
/// assert_eq!(hours_between(t(23), t(1)), Decimal::from(2));
/// ```
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> Decimal {
    let minutes = |t: NaiveTime| i64::from(t.hour() * 60 + t.minute());

    let mut diff = minutes(end) - minutes(start);
    if diff < 0 {
        diff += MINUTES_PER_DAY;
    }

    Decimal::new(diff, 0) / Decimal::new(60, 0)
}

/// Best-effort hours for a `"HH:MM - HH:MM"` string.
///
/// Display code calls this on untrusted text, so an unparsable range counts
/// as zero hours instead of failing. Use [`TimeRange`]'s `FromStr` to get
/// the parse error.
pub fn hours_in_range(range: &str) -> Decimal {
    match range.parse::<TimeRange>() {
        Ok(parsed) => parsed.hours(),
        Err(err) => {
            debug!(range = %range, error = %err, "Unparsable time range counted as zero hours");
            Decimal::ZERO
        }
    }
}
