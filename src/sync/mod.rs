//! Synchronisation with the remote calendar store.
//!
//! The remote is reached through the [`RemoteCalendar`] trait, which speaks
//! the JSON bodies in [`protocol`]. [`SyncEngine`] pulls the remote document
//! into shift records and pushes debounced saves back, carrying the last
//! known revision token. [`MemoryRemote`] is an in-process remote for tests
//! and offline use.

mod memory;
pub mod protocol;
mod remote;
mod scheduler;

pub use memory::MemoryRemote;
pub use protocol::{FetchResponse, SaveRequest, SaveResponse};
pub use remote::RemoteCalendar;
pub use scheduler::{SaveState, SyncEngine, SyncStatus};
