//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading schedule
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult};

use super::types::{CalendarConfig, ScheduleConfig, SyncConfig};

/// Loads and provides access to schedule configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── calendar.yaml   # Calendar name, product id, UID domain, venue, default location
/// ├── sync.yaml       # Debounce delay and commit message
/// └── profiles.yaml   # User profiles (see ProfileStore)
/// ```
///
/// # Example
///
/// ```no_run
/// use shift_calendar::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Calendar: {}", loader.calendar().calendar_name);
/// # Ok::<(), shift_calendar::error::ScheduleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ScheduleConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Both `calendar.yaml` and `sync.yaml` must be present. Fields missing
    /// from either file take their default values.
    ///
    /// # Errors
    ///
    /// - [`ScheduleError::ConfigNotFound`] if a file is missing
    /// - [`ScheduleError::ConfigParseError`] if a file is not valid YAML
    pub fn load<P: AsRef<Path>>(path: P) -> ScheduleResult<Self> {
        let path = path.as_ref();

        let calendar = Self::load_yaml::<CalendarConfig>(&path.join("calendar.yaml"))?;
        let sync = Self::load_yaml::<SyncConfig>(&path.join("sync.yaml"))?;

        debug!(
            dir = %path.display(),
            calendar = %calendar.calendar_name,
            debounce_ms = sync.debounce_ms,
            "Loaded schedule configuration"
        );

        Ok(Self {
            config: ScheduleConfig { calendar, sync },
        })
    }

    /// Loads and parses a YAML file.
    pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> ScheduleResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ScheduleError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ScheduleError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> ScheduleConfig {
        self.config
    }

    /// Returns the calendar settings.
    pub fn calendar(&self) -> &CalendarConfig {
        &self.config.calendar
    }

    /// Returns the sync settings.
    pub fn sync(&self) -> &SyncConfig {
        &self.config.sync
    }
}
