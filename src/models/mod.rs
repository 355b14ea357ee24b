//! Core data models for the shift calendar engine.
//!
//! This module contains the domain types shared by the codec, the store,
//! the statistics engine and the session.

mod position;
mod preference;
mod profile;
mod shift;
mod vacation;

pub use position::Position;
pub use preference::{PreferenceKind, ShiftPreference};
pub use profile::{UserProfile, initials_of};
pub use shift::{ShiftEntry, ShiftRecord, TimeRange, validate_id};
pub use vacation::{VacationRecord, VacationType};
