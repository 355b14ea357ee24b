//! HTTP request handlers for the shift calendar API.
//!
//! Every handler tags its log lines with a fresh correlation id. Handlers
//! that change the shift store schedule a debounced save of the whole store.

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::trailing_report;
use crate::error::ScheduleError;
use crate::models::{ShiftPreference, ShiftRecord, UserProfile};
use crate::session::{UpcomingShift, VacationStatus};
use crate::sync::SyncStatus;

use super::request::{MonthQuery, PreferenceRequest, ShiftRequest, VacationRequest};
use super::response::{
    ApiError, ApiErrorResponse, MonthResponse, PullResponse, StatisticsResponse,
};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/shifts", get(list_shifts).post(add_shift))
        .route("/shifts/next", get(next_shift))
        .route("/preferences", get(list_preferences).post(add_preference))
        .route("/vacation", get(get_vacation).put(set_vacation))
        .route("/statistics", get(statistics))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/calendar.ics", get(calendar_document))
        .route("/sync/pull", post(pull))
        .route("/sync/status", get(sync_status))
        .route("/logout", post(logout))
        .with_state(state)
}

/// Unwraps a JSON body, turning extractor rejections into API errors.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>, correlation_id: Uuid) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(error.with_status(StatusCode::BAD_REQUEST))
}

fn query<T>(query: Result<Query<T>, QueryRejection>, correlation_id: Uuid) -> ApiResult<T> {
    query.map(|Query(q)| q).map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Invalid query string");
        ApiError::validation_error(rejection.body_text()).with_status(StatusCode::BAD_REQUEST)
    })
}

/// Logs a domain error and converts it for the response.
fn rejected(error: ScheduleError, correlation_id: Uuid, what: &str) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %error, "{} rejected", what);
    error.into()
}

/// Handler for `GET /shifts`: shifts and calendar grid for a month.
async fn list_shifts(
    State(state): State<AppState>,
    month: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<Json<MonthResponse>> {
    let correlation_id = Uuid::new_v4();
    let month = query(month, correlation_id)?
        .resolve(state.today())
        .map_err(|e| e.with_status(StatusCode::BAD_REQUEST))?;

    let session = state.session().lock().await;
    let shifts = session.shifts_in_month(month).to_vec();
    info!(correlation_id = %correlation_id, month = %month, shifts = shifts.len(), "Listing shifts");

    Ok(Json(MonthResponse {
        month,
        grid: session.month_grid(month),
        shifts,
    }))
}

/// Handler for `POST /shifts`.
async fn add_shift(
    State(state): State<AppState>,
    payload: Result<Json<ShiftRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ShiftRecord>)> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(payload, correlation_id)?;

    let mut session = state.session().lock().await;
    let record = request.into_record(&session.config().calendar.default_location);
    let replaced = session
        .add_shift(record.clone(), state.today())
        .map_err(|e| rejected(e, correlation_id, "Shift"))?;

    state.sync().schedule_save(session.snapshot());
    info!(
        correlation_id = %correlation_id,
        id = %record.id,
        date = %record.date,
        replaced = replaced.is_some(),
        "Shift added"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for `GET /shifts/next`.
async fn next_shift(State(state): State<AppState>) -> Json<Option<UpcomingShift>> {
    let session = state.session().lock().await;
    Json(session.next_shift(state.now()))
}

/// Handler for `GET /preferences`.
async fn list_preferences(State(state): State<AppState>) -> Json<Vec<ShiftPreference>> {
    let session = state.session().lock().await;
    Json(session.preferences().to_vec())
}

/// Handler for `POST /preferences`.
async fn add_preference(
    State(state): State<AppState>,
    payload: Result<Json<PreferenceRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ShiftPreference>)> {
    let correlation_id = Uuid::new_v4();
    let preference: ShiftPreference = json_body(payload, correlation_id)?.into();

    let mut session = state.session().lock().await;
    let changed = session
        .add_preference(preference.clone(), state.today())
        .map_err(|e| rejected(e, correlation_id, "Preference"))?;

    if changed {
        state.sync().schedule_save(session.snapshot());
    }
    info!(
        correlation_id = %correlation_id,
        id = %preference.id,
        date = %preference.date,
        shift_created = changed,
        "Preference added"
    );
    Ok((StatusCode::CREATED, Json(preference)))
}

/// Handler for `GET /vacation`.
async fn get_vacation(State(state): State<AppState>) -> Json<Option<VacationStatus>> {
    let session = state.session().lock().await;
    Json(session.vacation_status(state.now()))
}

/// Handler for `PUT /vacation`.
async fn set_vacation(
    State(state): State<AppState>,
    payload: Result<Json<VacationRequest>, JsonRejection>,
) -> ApiResult<Json<Option<VacationStatus>>> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(payload, correlation_id)?;

    let mut session = state.session().lock().await;
    session
        .set_vacation(
            request.start_date,
            request.end_date,
            request.kind,
            state.today(),
        )
        .map_err(|e| rejected(e, correlation_id, "Vacation"))?;

    info!(correlation_id = %correlation_id, start = %request.start_date, "Vacation updated");
    Ok(Json(session.vacation_status(state.now())))
}

/// Handler for `GET /statistics`.
async fn statistics(
    State(state): State<AppState>,
    month: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult<Json<StatisticsResponse>> {
    let correlation_id = Uuid::new_v4();
    let month = query(month, correlation_id)?
        .resolve(state.today())
        .map_err(|e| e.with_status(StatusCode::BAD_REQUEST))?;

    let session = state.session().lock().await;
    let rate = session.profile().hourly_rate;
    let response = StatisticsResponse {
        month: session.monthly_stats(month),
        trailing: trailing_report(session.store().records(), month, rate),
    };

    info!(
        correlation_id = %correlation_id,
        month = %month,
        total_hours = %response.month.total_hours,
        "Statistics computed"
    );
    Ok(Json(response))
}

/// Handler for `GET /profile`.
async fn get_profile(State(state): State<AppState>) -> Json<UserProfile> {
    Json(state.session().lock().await.profile().clone())
}

/// Handler for `PUT /profile`.
///
/// The profile id cannot be changed; the session's id is kept. When a
/// profile store is attached the session only changes once the store has
/// saved the profile.
async fn update_profile(
    State(state): State<AppState>,
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> ApiResult<Json<UserProfile>> {
    let correlation_id = Uuid::new_v4();
    let mut profile = json_body(payload, correlation_id)?;

    let mut session = state.session().lock().await;
    profile.id = session.profile().id.clone();

    if let Some(mut store) = state.profiles() {
        profile = store
            .save(profile)
            .map_err(|e| rejected(e, correlation_id, "Profile save"))?;
    }
    session.update_profile(profile);

    info!(correlation_id = %correlation_id, user = %session.profile().id, "Profile updated");
    Ok(Json(session.profile().clone()))
}

/// Handler for `GET /calendar.ics`.
async fn calendar_document(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session().lock().await;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        session.calendar_document_at(state.now()),
    )
}

/// Handler for `POST /sync/pull`.
///
/// On failure the local store is left as it was.
async fn pull(State(state): State<AppState>) -> ApiResult<Json<PullResponse>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Pulling remote calendar");

    let pulled = state
        .sync()
        .pull()
        .await
        .map_err(|e| rejected(e, correlation_id, "Pull"))?;

    let mut session = state.session().lock().await;
    let replaced = match pulled {
        Some(records) => {
            session.replace_shifts(records);
            true
        }
        None => false,
    };

    info!(
        correlation_id = %correlation_id,
        replaced,
        records = session.store().len(),
        "Pull completed"
    );
    Ok(Json(PullResponse {
        replaced,
        records: session.store().len(),
        revision: state.sync().revision(),
    }))
}

/// Handler for `GET /sync/status`.
async fn sync_status(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(state.sync().status())
}

/// Handler for `POST /logout`.
async fn logout(State(state): State<AppState>) -> StatusCode {
    state.logout().await;
    info!("Logged out");
    StatusCode::NO_CONTENT
}
