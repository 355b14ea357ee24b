//! Shift calendar engine
//!
//! This crate keeps a worker's shift schedule: it reads and writes shifts as
//! iCalendar documents, computes worked hours and projected earnings, and
//! keeps a remote copy of the calendar in sync through debounced saves.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ics;
pub mod models;
pub mod session;
pub mod store;
pub mod sync;
