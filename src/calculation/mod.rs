//! Time utilities and the statistics engine.
//!
//! This module contains the pure date/time arithmetic used across the engine
//! (hours between times of day with overnight wrap, countdowns, month
//! rollover and the month grid) and the monthly and trailing-window
//! statistics built on it.

mod countdown;
mod hours;
mod month;
mod statistics;

pub use countdown::{Countdown, countdown, countdown_to};
pub use hours::{hours_between, hours_in_range};
pub use month::{GRID_CELLS, GridCell, MAX_YEAR, MIN_YEAR, YearMonth, month_grid};
pub use statistics::{MonthlyStats, TRAILING_MONTHS, TrailingReport, monthly_stats, trailing_report};
