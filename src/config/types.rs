//! Configuration types for calendar encoding and synchronisation.
//!
//! These are deserialized from the YAML files in a configuration directory.
//! Every field has a default, so partial files are accepted.

use serde::{Deserialize, Serialize};

/// Settings used when reading and writing calendar documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Written as `X-WR-CALNAME`.
    pub calendar_name: String,
    /// Written as `PRODID`.
    pub product_id: String,
    /// Domain appended to generated event UIDs.
    pub uid_domain: String,
    /// Venue written after the position code in each `SUMMARY`.
    pub venue_label: String,
    /// Location used for events that carry none, and for shifts created locally.
    pub default_location: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar_name: "Work Shifts".to_string(),
            product_id: "-//Shift Calendar//Schedule//EN".to_string(),
            uid_domain: "shift-calendar.local".to_string(),
            venue_label: "Main Street".to_string(),
            default_location: "Main Street".to_string(),
        }
    }
}

/// Settings for pushing the calendar to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Quiet period after the last change before a save is sent.
    pub debounce_ms: u64,
    /// Prefix of the message attached to every save.
    pub commit_message: String,
}

impl SyncConfig {
    /// The debounce delay as a [`std::time::Duration`].
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            commit_message: "Auto-sync from shift calendar".to_string(),
        }
    }
}

/// The complete configuration for one installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Calendar document settings.
    pub calendar: CalendarConfig,
    /// Remote synchronisation settings.
    pub sync: SyncConfig,
}
