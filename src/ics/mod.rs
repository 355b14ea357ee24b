//! iCalendar codec for shift records.
//!
//! Reading and writing go through the `icalendar` crate. [`fields`] collects
//! each event's properties, [`parse`] builds shift records from them and
//! [`generate`] writes records back out. Decoding a generated document
//! reproduces each record's date, first entry and location.
//!
//! # Example
//!
//! ```
//! use shift_calendar::config::CalendarConfig;
//! use shift_calendar::ics::{generate, parse};
//! use shift_calendar::models::{Position, ShiftEntry, ShiftRecord};
//! use chrono::NaiveDate;
//!
//! let calendar = CalendarConfig::default();
//! let record = ShiftRecord::single(
//!     "1",
//!     NaiveDate::from_ymd_opt(2026, 1, 7).unwrap(),
//!     ShiftEntry::new("22:00 - 06:00".parse().unwrap(), Position::Runner),
//!     "Main Street",
//! );
//!
//! let decoded = parse(&generate(&[record.clone()], &calendar), &calendar);
//! assert_eq!(decoded[0].date, record.date);
//! assert_eq!(decoded[0].entries, record.entries);
//! assert_eq!(decoded[0].location, record.location);
//! ```

pub mod fields;
mod generate;
mod parse;

pub use generate::{external_uid, generate, generate_at};
pub use parse::{FALLBACK_END_HOUR, parse, parse_timestamp};
