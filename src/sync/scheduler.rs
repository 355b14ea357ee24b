//! Debounced calendar saves.
//!
//! Every local change calls [`SyncEngine::schedule_save`] with a snapshot of
//! the store. The snapshot is sent only after the configured quiet period
//! passes with no newer snapshot. The engine moves through
//! `Idle -> Scheduled -> Sending -> Idle | Failed`:
//!
//! - a new snapshot while `Scheduled` aborts the pending timer and starts a
//!   new one;
//! - a new snapshot while `Sending` never interrupts the send; its timer
//!   starts at once and its send waits for the current one to finish, so it
//!   carries the freshest revision token;
//! - a failed send is not retried. The next change schedules a new save;
//! - a pull that returns records discards any pending save, since the
//!   caller replaces local state with what was pulled;
//! - a reset discards pending saves and any token an in-flight send returns.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{CalendarConfig, SyncConfig};
use crate::error::{ScheduleError, ScheduleResult};
use crate::ics;
use crate::models::ShiftRecord;

use super::protocol::SaveRequest;
use super::remote::RemoteCalendar;

/// Where the save pipeline currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SaveState {
    /// Nothing pending.
    Idle,
    /// A snapshot is waiting for the quiet period to pass.
    Scheduled,
    /// A document is being sent.
    Sending,
    /// The last send failed.
    Failed {
        /// Why it failed.
        message: String,
    },
}

/// A point-in-time view of the engine, as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Current save state.
    #[serde(flatten)]
    pub state: SaveState,
    /// Last known remote revision token.
    pub revision: Option<String>,
}

#[derive(Debug)]
struct Inner {
    state: SaveState,
    revision: Option<String>,
    pending: Option<JoinHandle<()>>,
    // bumped on every schedule, cancel, pull or reset; a timer only acts if it still matches
    generation: u64,
    // bumped on reset; a send only stores its new token if this is unchanged
    epoch: u64,
}

#[derive(Debug)]
struct Shared {
    inner: Mutex<Inner>,
    send_gate: tokio::sync::Mutex<()>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Pulls the remote calendar and pushes debounced saves back to it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use shift_calendar::config::{CalendarConfig, SyncConfig};
/// use shift_calendar::sync::{MemoryRemote, SaveState, SyncEngine};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let remote = Arc::new(MemoryRemote::new());
/// let engine = SyncEngine::new(remote.clone(), CalendarConfig::default(), SyncConfig::default());
///
/// engine.pull().await.unwrap();
/// assert_eq!(engine.revision(), Some(remote.sha()));
/// assert_eq!(engine.state(), SaveState::Idle);
/// # }
/// ```
pub struct SyncEngine {
    remote: Arc<dyn RemoteCalendar>,
    calendar: CalendarConfig,
    sync: SyncConfig,
    shared: Arc<Shared>,
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("calendar", &self.calendar)
            .field("sync", &self.sync)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    /// Creates an idle engine with no known revision.
    pub fn new(remote: Arc<dyn RemoteCalendar>, calendar: CalendarConfig, sync: SyncConfig) -> Self {
        Self {
            remote,
            calendar,
            sync,
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: SaveState::Idle,
                    revision: None,
                    pending: None,
                    generation: 0,
                    epoch: 0,
                }),
                send_gate: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// The current save state.
    pub fn state(&self) -> SaveState {
        self.shared.lock().state.clone()
    }

    /// The last known remote revision token.
    pub fn revision(&self) -> Option<String> {
        self.shared.lock().revision.clone()
    }

    /// State and revision together.
    pub fn status(&self) -> SyncStatus {
        let inner = self.shared.lock();
        SyncStatus {
            state: inner.state.clone(),
            revision: inner.revision.clone(),
        }
    }

    /// Fetches and decodes the remote calendar.
    ///
    /// On success the revision token is stored and the decoded records are
    /// returned; `None` means the remote holds no document yet, in which case
    /// only the token is updated. Returning records also discards a pending
    /// save, whose snapshot predates them. On failure nothing changes and the
    /// error is returned.
    pub async fn pull(&self) -> ScheduleResult<Option<Vec<ShiftRecord>>> {
        let _gate = self.shared.send_gate.lock().await;

        let response = self.remote.fetch().await.inspect_err(|e| {
            warn!(error = %e, "Calendar fetch failed");
        })?;

        if !response.success {
            warn!("Remote refused calendar fetch");
            return Err(ScheduleError::RemoteRejected {
                message: "fetch returned success: false".to_string(),
            });
        }

        let empty = response.content.trim().is_empty();
        {
            let mut inner = self.shared.lock();
            if !empty {
                inner.generation += 1;
                if let Some(timer) = inner.pending.take() {
                    debug!(generation = inner.generation, "Pulled document supersedes pending save");
                    timer.abort();
                }
                if inner.state == SaveState::Scheduled {
                    inner.state = SaveState::Idle;
                }
            }
            if let Some(sha) = &response.sha {
                inner.revision = Some(sha.clone());
            }
        }

        if empty {
            info!(revision = ?response.sha, "Remote calendar is empty");
            return Ok(None);
        }

        let records = ics::parse(&response.content, &self.calendar);
        info!(records = records.len(), revision = ?response.sha, "Pulled remote calendar");
        Ok(Some(records))
    }

    /// Schedules `snapshot` to be saved after the quiet period.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule_save(&self, snapshot: Vec<ShiftRecord>) {
        let mut inner = self.shared.lock();
        inner.generation += 1;
        let generation = inner.generation;

        if inner.state == SaveState::Scheduled {
            if let Some(timer) = inner.pending.take() {
                debug!(generation, "Superseding pending save");
                timer.abort();
            }
        }
        inner.state = SaveState::Scheduled;

        let shared = Arc::clone(&self.shared);
        let remote = Arc::clone(&self.remote);
        let calendar = self.calendar.clone();
        let message = self.sync.commit_message.clone();
        let delay = self.sync.debounce();

        inner.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _gate = shared.send_gate.lock().await;

            {
                let mut inner = shared.lock();
                if inner.generation != generation {
                    return;
                }
                inner.state = SaveState::Sending;
                inner.pending = None;
            }

            let outcome = send(&shared, remote.as_ref(), &calendar, &message, &snapshot).await;

            let mut inner = shared.lock();
            if inner.generation != generation {
                // a newer snapshot is already scheduled and owns the state
                return;
            }
            inner.state = match outcome {
                Ok(_) => SaveState::Idle,
                Err(ScheduleError::MissingRevision) => {
                    info!("Skipping save: no revision token yet");
                    SaveState::Idle
                }
                Err(e) => SaveState::Failed {
                    message: e.to_string(),
                },
            };
        }));

        debug!(generation, delay_ms = delay.as_millis() as u64, "Save scheduled");
    }

    /// Sends `snapshot` immediately, waiting for any in-flight send first.
    ///
    /// Returns the new revision token, or `None` when the snapshot was empty
    /// and nothing was sent. Does not touch a pending scheduled save.
    pub async fn save_now(&self, snapshot: &[ShiftRecord]) -> ScheduleResult<Option<String>> {
        let _gate = self.shared.send_gate.lock().await;
        send(
            &self.shared,
            self.remote.as_ref(),
            &self.calendar,
            &self.sync.commit_message,
            snapshot,
        )
        .await
    }

    /// Aborts a pending save that has not started sending.
    ///
    /// Returns true if a save was cancelled.
    pub fn cancel(&self) -> bool {
        let mut inner = self.shared.lock();
        if inner.state != SaveState::Scheduled {
            return false;
        }
        inner.generation += 1;
        if let Some(timer) = inner.pending.take() {
            timer.abort();
        }
        inner.state = SaveState::Idle;
        debug!("Pending save cancelled");
        true
    }

    /// Cancels any pending save and forgets the revision token.
    ///
    /// A send already in flight is not interrupted, but its outcome is
    /// dropped: the token it returns is not stored and the state stays
    /// `Idle`.
    pub fn reset(&self) {
        let mut inner = self.shared.lock();
        inner.generation += 1;
        inner.epoch += 1;
        if let Some(timer) = inner.pending.take() {
            timer.abort();
        }
        inner.revision = None;
        inner.state = SaveState::Idle;
        debug!(generation = inner.generation, "Sync engine reset");
    }
}

impl Drop for SyncEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Generates and posts one document. The caller holds the send gate.
async fn send(
    shared: &Shared,
    remote: &dyn RemoteCalendar,
    calendar: &CalendarConfig,
    message: &str,
    snapshot: &[ShiftRecord],
) -> ScheduleResult<Option<String>> {
    if snapshot.is_empty() {
        info!("Skipping save: no shifts to write");
        return Ok(None);
    }

    let (sha, epoch) = {
        let inner = shared.lock();
        let sha = inner.revision.clone().ok_or(ScheduleError::MissingRevision)?;
        (sha, inner.epoch)
    };

    let request = SaveRequest {
        content: ics::generate(snapshot, calendar),
        sha,
        message: message.to_string(),
    };

    let response = remote.save(&request).await.inspect_err(|e| {
        warn!(error = %e, records = snapshot.len(), "Calendar save failed");
    })?;

    if !response.success {
        warn!(records = snapshot.len(), "Remote refused calendar save");
        return Err(ScheduleError::RemoteRejected {
            message: "save returned success: false".to_string(),
        });
    }

    let new_sha = response.sha.ok_or_else(|| ScheduleError::RemoteRejected {
        message: "save response carried no revision token".to_string(),
    })?;

    let mut inner = shared.lock();
    if inner.epoch != epoch {
        info!(records = snapshot.len(), "Saved calendar after reset; discarding its revision");
        return Ok(Some(new_sha));
    }
    inner.revision = Some(new_sha.clone());
    info!(records = snapshot.len(), revision = %new_sha, "Saved calendar");
    Ok(Some(new_sha))
}
