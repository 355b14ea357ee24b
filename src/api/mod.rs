//! HTTP API for the shift calendar.
//!
//! Exposes one user's session as JSON endpoints for a UI: shifts and the
//! month grid, preferences, vacation, statistics, the profile, the generated
//! calendar document and remote sync.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{MonthQuery, PreferenceRequest, ShiftRequest, VacationRequest};
pub use response::{ApiError, ApiErrorResponse, MonthResponse, PullResponse, StatisticsResponse};
pub use state::AppState;
