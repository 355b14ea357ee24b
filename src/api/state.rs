//! Application state for the shift calendar API.
//!
//! This module defines the shared state available to all request handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, NaiveDate, NaiveDateTime};
use tokio::sync::Mutex as AsyncMutex;

use crate::config::ProfileStore;
use crate::session::Session;
use crate::sync::SyncEngine;

type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Shared application state.
///
/// Holds the signed-in user's session, the sync engine pushing their
/// calendar, and optionally the profile store their profile is saved to.
#[derive(Clone)]
pub struct AppState {
    session: Arc<AsyncMutex<Session>>,
    sync: Arc<SyncEngine>,
    profiles: Option<Arc<Mutex<ProfileStore>>>,
    clock: Clock,
}

impl AppState {
    /// Creates the state for one session, reading the local clock.
    pub fn new(session: Session, sync: SyncEngine) -> Self {
        Self {
            session: Arc::new(AsyncMutex::new(session)),
            sync: Arc::new(sync),
            profiles: None,
            clock: Arc::new(|| Local::now().naive_local()),
        }
    }

    /// Persists profile updates to `profiles`.
    pub fn with_profiles(mut self, profiles: ProfileStore) -> Self {
        self.profiles = Some(Arc::new(Mutex::new(profiles)));
        self
    }

    /// Replaces the clock used for "today" and countdowns.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The session, locked for the duration of a request.
    pub fn session(&self) -> &AsyncMutex<Session> {
        &self.session
    }

    /// The sync engine.
    pub fn sync(&self) -> &SyncEngine {
        &self.sync
    }

    /// The profile store, if one is attached.
    pub fn profiles(&self) -> Option<MutexGuard<'_, ProfileStore>> {
        self.profiles
            .as_ref()
            .map(|store| store.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// The current local date and time.
    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    /// The current local date.
    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Ends the session: clears local state, cancels a pending save and
    /// forgets the revision token.
    pub async fn logout(&self) {
        self.sync.reset();
        self.session.lock().await.logout();
    }
}
