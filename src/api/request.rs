//! Request types for the shift calendar API.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calculation::{MAX_YEAR, MIN_YEAR, YearMonth};
use crate::models::{
    Position, PreferenceKind, ShiftEntry, ShiftPreference, ShiftRecord, TimeRange, VacationType,
};
use crate::session::local_id;

use super::response::ApiError;

/// `?year=&month=` query; either part defaults to the current month's.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MonthQuery {
    /// Calendar year.
    pub year: Option<i32>,
    /// Month, 1 through 12.
    pub month: Option<u32>,
}

impl MonthQuery {
    /// Resolves the query against the month containing `today`.
    pub fn resolve(self, today: NaiveDate) -> Result<YearMonth, ApiError> {
        let year = self.year.unwrap_or_else(|| today.year());
        let month = self.month.unwrap_or_else(|| today.month());
        YearMonth::new(year, month).ok_or_else(|| {
            ApiError::validation_error(format!(
                "year must be between {} and {} and month between 1 and 12, got {}-{}",
                MIN_YEAR, MAX_YEAR, year, month
            ))
        })
    }
}

/// Body for `POST /shifts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftRequest {
    /// Identifier; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// The shift date.
    pub date: NaiveDate,
    /// Working hours as `"HH:MM - HH:MM"`.
    pub time: TimeRange,
    /// Position code; unknown codes become kitchen.
    pub position: Position,
    /// Location; the configured default when absent.
    #[serde(default)]
    pub location: Option<String>,
}

impl ShiftRequest {
    /// Builds the record, filling in the id and location.
    pub fn into_record(self, default_location: &str) -> ShiftRecord {
        ShiftRecord::single(
            self.id.unwrap_or_else(local_id),
            self.date,
            ShiftEntry::new(self.time, self.position),
            self.location
                .unwrap_or_else(|| default_location.to_string()),
        )
    }
}

/// Body for `POST /preferences`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceRequest {
    /// Identifier; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// The date the preference applies to.
    pub date: NaiveDate,
    /// What is being asked for, tagged by `kind`.
    #[serde(flatten)]
    pub kind: PreferenceKind,
    /// Requested position.
    #[serde(default)]
    pub position: Option<Position>,
}

impl From<PreferenceRequest> for ShiftPreference {
    fn from(req: PreferenceRequest) -> Self {
        ShiftPreference {
            id: req.id.unwrap_or_else(local_id),
            date: req.date,
            kind: req.kind,
            position: req.position,
        }
    }
}

/// Body for `PUT /vacation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationRequest {
    /// First day off.
    pub start_date: NaiveDate,
    /// Last day off, inclusive.
    pub end_date: NaiveDate,
    /// Vacation category.
    #[serde(rename = "type")]
    pub kind: VacationType,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
    }

    #[test]
    fn test_month_query_defaults_to_current() {
        let month = MonthQuery::default().resolve(today()).unwrap();
        assert_eq!(month, YearMonth::new(2026, 4).unwrap());
    }

    #[test]
    fn test_month_query_partial() {
        let query = MonthQuery {
            year: None,
            month: Some(12),
        };
        assert_eq!(query.resolve(today()).unwrap(), YearMonth::new(2026, 12).unwrap());
    }

    #[test]
    fn test_month_query_rejects_month_13() {
        let query = MonthQuery {
            year: Some(2026),
            month: Some(13),
        };
        let error = query.resolve(today()).unwrap_err();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_month_query_rejects_far_years() {
        for year in [0, -5, 10_000, 300_000, i32::MAX, i32::MIN] {
            let query = MonthQuery {
                year: Some(year),
                month: Some(1),
            };
            let error = query.resolve(today()).unwrap_err();
            assert_eq!(error.code, "VALIDATION_ERROR", "year {}", year);
        }
    }

    #[test]
    fn test_shift_request_fills_defaults() {
        let json = r#"{"date":"2026-05-01","time":"22:00 - 06:00","position":"run"}"#;
        let request: ShiftRequest = serde_json::from_str(json).unwrap();
        let record = request.into_record("Main Street");

        assert!(!record.id.is_empty());
        assert_eq!(record.location, "Main Street");
        assert_eq!(record.entries[0].position, Position::Runner);
        assert!(record.entries[0].time.is_overnight());
    }

    #[test]
    fn test_shift_request_rejects_bad_time() {
        let json = r#"{"date":"2026-05-01","time":"late","position":"KIT"}"#;
        assert!(serde_json::from_str::<ShiftRequest>(json).is_err());
    }

    #[test]
    fn test_preference_request_with_window() {
        let json = r#"{"id":"p1","date":"2026-05-01","kind":"work_between","from":"10:00:00","to":"18:00:00","position":"CAS"}"#;
        let preference: ShiftPreference = serde_json::from_str::<PreferenceRequest>(json)
            .unwrap()
            .into();

        assert_eq!(preference.id, "p1");
        assert_eq!(
            preference.kind.time_range().unwrap().to_string(),
            "10:00 - 18:00"
        );
        assert_eq!(preference.position, Some(Position::Cashier));
    }

    #[test]
    fn test_vacation_request_uses_type_field() {
        let json = r#"{"start_date":"2026-07-01","end_date":"2026-07-14","type":"sick_leave"}"#;
        let request: VacationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.kind, VacationType::SickLeave);
    }
}
