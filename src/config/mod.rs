//! Configuration loading and user profile storage.
//!
//! Calendar and sync settings are read from YAML files in a configuration
//! directory; user profiles live in a separate YAML file that is written back
//! on every profile save.
//!
//! # Example
//!
//! ```no_run
//! use shift_calendar::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Debounce: {} ms", config.sync().debounce_ms);
//! ```

mod loader;
mod profiles;
mod types;

pub use loader::ConfigLoader;
pub use profiles::ProfileStore;
pub use types::{CalendarConfig, ScheduleConfig, SyncConfig};
