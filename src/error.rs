//! Error types for the shift calendar engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition the engine reports to its caller. Malformed calendar
//! events are not errors: the parser drops them and keeps going.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the shift calendar engine.
///
/// # Example
///
/// ```
/// use shift_calendar::error::ScheduleError;
///
/// let error = ScheduleError::ConfigNotFound {
///     path: "/missing/calendar.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/calendar.yaml");
/// ```
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration file could not be written.
    #[error("Failed to write configuration file '{path}': {message}")]
    ConfigWriteError {
        /// The path that could not be written.
        path: String,
        /// A description of the write error.
        message: String,
    },

    /// A time range string could not be parsed.
    #[error("Invalid time range '{value}': expected 'HH:MM - HH:MM'")]
    InvalidTimeRange {
        /// The rejected input.
        value: String,
    },

    /// A shift, preference or vacation was dated before today.
    #[error("Date {date} is in the past (today is {today})")]
    DateInPast {
        /// The rejected date.
        date: NaiveDate,
        /// The reference date used for the check.
        today: NaiveDate,
    },

    /// A vacation ends before it starts.
    #[error("Invalid vacation: end date {end} is before start date {start}")]
    InvalidVacation {
        /// The requested first day.
        start: NaiveDate,
        /// The requested last day.
        end: NaiveDate,
    },

    /// A shift preference is missing data its kind requires.
    #[error("Invalid preference for {date}: {message}")]
    InvalidPreference {
        /// The preference date.
        date: NaiveDate,
        /// What is missing or wrong.
        message: String,
    },

    /// A caller-supplied id is empty or contains control characters.
    #[error("Invalid id {id:?}: {message}")]
    InvalidId {
        /// The rejected id.
        id: String,
        /// Why it was rejected.
        message: String,
    },

    /// A record id is already used by a record on another date.
    #[error("Id '{id}' is already used by the shift on {existing}")]
    DuplicateId {
        /// The clashing id.
        id: String,
        /// Date of the record that already holds the id.
        existing: NaiveDate,
    },

    /// The remote calendar could not be reached.
    #[error("Remote calendar unavailable: {message}")]
    RemoteUnavailable {
        /// Transport-level description.
        message: String,
    },

    /// The remote calendar answered with `success: false`.
    #[error("Remote calendar rejected the request: {message}")]
    RemoteRejected {
        /// Description returned by or derived from the remote.
        message: String,
    },

    /// The revision token sent with a save no longer matches the remote.
    #[error("Stale revision token '{sha}': the remote calendar changed since the last sync")]
    StaleRevision {
        /// The token that was rejected.
        sha: String,
    },

    /// A save was attempted before any successful fetch.
    #[error("No revision token known: fetch the remote calendar before saving")]
    MissingRevision,
}

/// A type alias for Results that return ScheduleError.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = ScheduleError::ConfigNotFound {
            path: "/missing/calendar.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/calendar.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = ScheduleError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_time_range_displays_value() {
        let error = ScheduleError::InvalidTimeRange {
            value: "8-16".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid time range '8-16': expected 'HH:MM - HH:MM'"
        );
    }

    #[test]
    fn test_date_in_past_displays_both_dates() {
        let error = ScheduleError::DateInPast {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            today: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Date 2025-01-01 is in the past (today is 2025-03-01)"
        );
    }

    #[test]
    fn test_invalid_vacation_displays_range() {
        let error = ScheduleError::InvalidVacation {
            start: NaiveDate::from_ymd_opt(2025, 12, 26).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 12, 24).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid vacation: end date 2025-12-24 is before start date 2025-12-26"
        );
    }

    #[test]
    fn test_invalid_id_escapes_control_characters() {
        let error = ScheduleError::InvalidId {
            id: "x\nSUMMARY:LOB".to_string(),
            message: "control characters are not allowed".to_string(),
        };
        assert!(!error.to_string().contains('\n'));
        assert!(error.to_string().contains("x\\nSUMMARY:LOB"));
    }

    #[test]
    fn test_stale_revision_displays_sha() {
        let error = ScheduleError::StaleRevision {
            sha: "abc123".to_string(),
        };
        assert!(error.to_string().contains("abc123"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<ScheduleError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_revision() -> ScheduleResult<()> {
            Err(ScheduleError::MissingRevision)
        }

        fn propagates_error() -> ScheduleResult<()> {
            returns_missing_revision()?;
            Ok(())
        }

        assert!(matches!(
            propagates_error(),
            Err(ScheduleError::MissingRevision)
        ));
    }
}
