//! Response types for the shift calendar API.
//!
//! This module defines the response bodies and the mapping from
//! [`ScheduleError`] to HTTP errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::{GridCell, MonthlyStats, TrailingReport, YearMonth};
use crate::error::ScheduleError;
use crate::models::ShiftRecord;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Pairs the error with a status code.
    pub fn with_status(self, status: StatusCode) -> ApiErrorResponse {
        ApiErrorResponse {
            status,
            error: self,
        }
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ScheduleError> for ApiErrorResponse {
    fn from(error: ScheduleError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            ScheduleError::ConfigNotFound { .. }
            | ScheduleError::ConfigParseError { .. }
            | ScheduleError::ConfigWriteError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            ScheduleError::InvalidTimeRange { .. } => (StatusCode::BAD_REQUEST, "INVALID_TIME_RANGE"),
            ScheduleError::DateInPast { .. } => (StatusCode::BAD_REQUEST, "DATE_IN_PAST"),
            ScheduleError::InvalidVacation { .. } => (StatusCode::BAD_REQUEST, "INVALID_VACATION"),
            ScheduleError::InvalidPreference { .. } => {
                (StatusCode::BAD_REQUEST, "INVALID_PREFERENCE")
            }
            ScheduleError::InvalidId { .. } => (StatusCode::BAD_REQUEST, "INVALID_ID"),
            ScheduleError::DuplicateId { .. } => (StatusCode::CONFLICT, "DUPLICATE_ID"),
            ScheduleError::RemoteUnavailable { .. } => (StatusCode::BAD_GATEWAY, "REMOTE_UNAVAILABLE"),
            ScheduleError::RemoteRejected { .. } => (StatusCode::BAD_GATEWAY, "REMOTE_REJECTED"),
            ScheduleError::StaleRevision { .. } => (StatusCode::CONFLICT, "STALE_REVISION"),
            ScheduleError::MissingRevision => (StatusCode::CONFLICT, "MISSING_REVISION"),
        };

        let error = match error {
            ScheduleError::StaleRevision { .. } => ApiError::with_details(
                code,
                message,
                "Pull the remote calendar before saving again",
            ),
            ScheduleError::MissingRevision => {
                ApiError::with_details(code, message, "Pull the remote calendar first")
            }
            _ => ApiError::new(code, message),
        };

        ApiErrorResponse { status, error }
    }
}

/// Body of `GET /shifts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthResponse {
    /// The month shown.
    pub month: YearMonth,
    /// Shifts dated in the month, ascending.
    pub shifts: Vec<ShiftRecord>,
    /// The 42-cell calendar grid.
    pub grid: Vec<GridCell>,
}

/// Body of `GET /statistics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResponse {
    /// Figures for the requested month.
    pub month: MonthlyStats,
    /// The requested month and the two before it.
    pub trailing: TrailingReport,
}

/// Body of `POST /sync/pull`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullResponse {
    /// Whether the local store was replaced.
    pub replaced: bool,
    /// Records in the store afterwards.
    pub records: usize,
    /// Revision token now known.
    pub revision: Option<String>,
}
