//! In-memory [`RemoteCalendar`] with revision checking.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ScheduleError, ScheduleResult};

use super::protocol::{FetchResponse, SaveRequest, SaveResponse};
use super::remote::RemoteCalendar;

#[derive(Debug)]
struct Stored {
    content: String,
    sha: String,
    saves: Vec<SaveRequest>,
    fetches: usize,
}

/// A remote calendar held in process memory.
///
/// Every accepted save gets a fresh revision token; a save carrying any
/// other token than the current one is refused with
/// [`ScheduleError::StaleRevision`]. Accepted requests are recorded for
/// inspection.
///
/// ```
/// use shift_calendar::sync::{MemoryRemote, RemoteCalendar, SaveRequest};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let remote = MemoryRemote::with_document("BEGIN:VCALENDAR\nEND:VCALENDAR");
/// let sha = remote.fetch().await.unwrap().sha.unwrap();
///
/// let request = SaveRequest { content: "new".into(), sha, message: "sync".into() };
/// assert!(remote.save(&request).await.unwrap().success);
/// assert!(remote.save(&request).await.is_err());
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryRemote {
    stored: Mutex<Stored>,
    offline: AtomicBool,
    save_delay_ms: AtomicU64,
}

impl MemoryRemote {
    /// A remote with no document yet.
    pub fn new() -> Self {
        Self::with_document("")
    }

    /// A remote already holding `content`.
    pub fn with_document(content: impl Into<String>) -> Self {
        Self {
            stored: Mutex::new(Stored {
                content: content.into(),
                sha: new_sha(),
                saves: Vec::new(),
                fetches: 0,
            }),
            offline: AtomicBool::new(false),
            save_delay_ms: AtomicU64::new(0),
        }
    }

    /// Makes every call fail with [`ScheduleError::RemoteUnavailable`] while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Makes every save wait `delay` before it is applied, like a slow link.
    pub fn set_save_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.save_delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Replaces the document as if another client had saved it.
    ///
    /// Returns the new revision token.
    pub fn overwrite(&self, content: impl Into<String>) -> String {
        let mut stored = self.lock();
        stored.content = content.into();
        stored.sha = new_sha();
        stored.sha.clone()
    }

    /// The current document.
    pub fn content(&self) -> String {
        self.lock().content.clone()
    }

    /// The current revision token.
    pub fn sha(&self) -> String {
        self.lock().sha.clone()
    }

    /// Accepted saves, oldest first.
    pub fn saves(&self) -> Vec<SaveRequest> {
        self.lock().saves.clone()
    }

    /// Number of fetches served.
    pub fn fetch_count(&self) -> usize {
        self.lock().fetches
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Stored> {
        // the guarded data stays consistent even if a holder panicked
        self.stored.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_online(&self) -> ScheduleResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ScheduleError::RemoteUnavailable {
                message: "memory remote is offline".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

fn new_sha() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl RemoteCalendar for MemoryRemote {
    async fn fetch(&self) -> ScheduleResult<FetchResponse> {
        self.check_online()?;
        let mut stored = self.lock();
        stored.fetches += 1;
        Ok(FetchResponse {
            success: true,
            content: stored.content.clone(),
            sha: Some(stored.sha.clone()),
        })
    }

    async fn save(&self, request: &SaveRequest) -> ScheduleResult<SaveResponse> {
        self.check_online()?;
        let delay = self.save_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let mut stored = self.lock();
        if request.sha != stored.sha {
            debug!(sent = %request.sha, current = %stored.sha, "Refusing save with stale revision");
            return Err(ScheduleError::StaleRevision {
                sha: request.sha.clone(),
            });
        }

        stored.content = request.content.clone();
        stored.sha = new_sha();
        stored.saves.push(request.clone());
        Ok(SaveResponse {
            success: true,
            sha: Some(stored.sha.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: &str, sha: &str) -> SaveRequest {
        SaveRequest {
            content: content.to_string(),
            sha: sha.to_string(),
            message: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_document_and_sha() {
        let remote = MemoryRemote::with_document("doc");
        let response = remote.fetch().await.unwrap();
        assert!(response.success);
        assert_eq!(response.content, "doc");
        assert_eq!(response.sha, Some(remote.sha()));
        assert_eq!(remote.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_save_rotates_sha() {
        let remote = MemoryRemote::new();
        let before = remote.sha();

        let response = remote.save(&request("v2", &before)).await.unwrap();
        let after = response.sha.unwrap();

        assert_ne!(before, after);
        assert_eq!(remote.sha(), after);
        assert_eq!(remote.content(), "v2");
        assert_eq!(remote.saves().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_sha_is_rejected() {
        let remote = MemoryRemote::with_document("v1");
        let old = remote.sha();
        remote.overwrite("changed elsewhere");

        let result = remote.save(&request("mine", &old)).await;
        assert!(matches!(result, Err(ScheduleError::StaleRevision { sha }) if sha == old));
        assert_eq!(remote.content(), "changed elsewhere");
        assert!(remote.saves().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_delay_holds_the_save_back() {
        let remote = std::sync::Arc::new(MemoryRemote::new());
        remote.set_save_delay(Duration::from_secs(2));
        let sha = remote.sha();

        let slow = {
            let remote = remote.clone();
            tokio::spawn(async move { remote.save(&request("late", &sha)).await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(remote.saves().is_empty());

        assert!(slow.await.unwrap().is_ok());
        assert_eq!(remote.content(), "late");
    }

    #[tokio::test]
    async fn test_offline_remote_is_unavailable() {
        let remote = MemoryRemote::new();
        remote.set_offline(true);
        assert!(matches!(
            remote.fetch().await,
            Err(ScheduleError::RemoteUnavailable { .. })
        ));

        remote.set_offline(false);
        assert!(remote.fetch().await.is_ok());
    }
}
