//! The remote calendar port.

use async_trait::async_trait;

use crate::error::ScheduleResult;

use super::protocol::{FetchResponse, SaveRequest, SaveResponse};

/// A store holding the shared calendar document and its revision token.
///
/// Transport failures are reported as [`crate::error::ScheduleError::RemoteUnavailable`];
/// a rejected save because the token is out of date as
/// [`crate::error::ScheduleError::StaleRevision`]. Any other refusal comes
/// back as a response with `success: false`.
#[async_trait]
pub trait RemoteCalendar: Send + Sync {
    /// Reads the current document and its revision token.
    async fn fetch(&self) -> ScheduleResult<FetchResponse>;

    /// Stores a new document based on the revision in `request.sha`.
    async fn save(&self, request: &SaveRequest) -> ScheduleResult<SaveResponse>;
}
