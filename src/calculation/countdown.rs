//! Countdowns to upcoming shifts and vacations.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Whole days, hours and minutes remaining until a moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    /// Whole days remaining.
    pub days: i64,
    /// Whole hours remaining after the days.
    pub hours: i64,
    /// Whole minutes remaining after the hours.
    pub minutes: i64,
}

impl Countdown {
    /// The countdown for a target that is absent or already reached.
    pub const ZERO: Countdown = Countdown {
        days: 0,
        hours: 0,
        minutes: 0,
    };

    /// Returns true when nothing remains.
    pub fn is_zero(&self) -> bool {
        *self == Countdown::ZERO
    }
}

/// Time remaining from `now` until `target`, floored to whole minutes.
///
/// Past or current targets yield [`Countdown::ZERO`].
///
/// # Example
///
/// ```
/// use shift_calendar::calculation::{countdown_to, Countdown};
/// use chrono::NaiveDate;
///
/// let now = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let target = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap().and_hms_opt(13, 30, 59).unwrap();
/// assert_eq!(countdown_to(target, now), Countdown { days: 2, hours: 3, minutes: 30 });
/// ```
pub fn countdown_to(target: NaiveDateTime, now: NaiveDateTime) -> Countdown {
    let remaining = target - now;
    if remaining <= chrono::Duration::zero() {
        return Countdown::ZERO;
    }

    let total_minutes = remaining.num_minutes();
    Countdown {
        days: total_minutes / (24 * 60),
        hours: (total_minutes / 60) % 24,
        minutes: total_minutes % 60,
    }
}

/// Countdown to a date, optionally at a time of day (midnight otherwise).
///
/// An absent date yields [`Countdown::ZERO`].
pub fn countdown(
    target_date: Option<NaiveDate>,
    target_time: Option<NaiveTime>,
    now: NaiveDateTime,
) -> Countdown {
    let Some(date) = target_date else {
        return Countdown::ZERO;
    };
    let target = date.and_time(target_time.unwrap_or(NaiveTime::MIN));
    countdown_to(target, now)
}
