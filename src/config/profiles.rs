//! Per-user profile persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::UserProfile;

use super::loader::ConfigLoader;

/// Profiles keyed by user id, backed by a YAML file.
///
/// A missing file is an empty store; it is created on the first save.
///
/// ```no_run
/// use shift_calendar::config::ProfileStore;
///
/// let store = ProfileStore::open("./config/default/profiles.yaml")?;
/// if let Some(profile) = store.get("u-100") {
///     println!("{} ({})", profile.name, profile.initials);
/// }
/// # Ok::<(), shift_calendar::error::ScheduleError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: BTreeMap<String, UserProfile>,
}

impl ProfileStore {
    /// Reads the profile file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> ScheduleResult<Self> {
        let path = path.as_ref().to_path_buf();
        let profiles = if path.exists() {
            ConfigLoader::load_yaml::<BTreeMap<String, UserProfile>>(&path)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, profiles })
    }

    /// The profile stored for `user_id`.
    pub fn get(&self, user_id: &str) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    /// All stored profiles, ordered by user id.
    pub fn profiles(&self) -> impl Iterator<Item = &UserProfile> {
        self.profiles.values()
    }

    /// Stores `profile` under its id and rewrites the file.
    ///
    /// Initials are recomputed from the name before saving. Returns the
    /// profile as stored. If the file cannot be written the store keeps its
    /// previous contents.
    pub fn save(&mut self, mut profile: UserProfile) -> ScheduleResult<UserProfile> {
        profile.refresh_initials();
        let mut profiles = self.profiles.clone();
        profiles.insert(profile.id.clone(), profile.clone());

        self.write(&profiles)?;
        self.profiles = profiles;
        info!(user = %profile.id, path = %self.path.display(), "Saved user profile");
        Ok(profile)
    }

    fn write(&self, profiles: &BTreeMap<String, UserProfile>) -> ScheduleResult<()> {
        let write_error = |message: String| ScheduleError::ConfigWriteError {
            path: self.path.display().to_string(),
            message,
        };

        let yaml = serde_yaml::to_string(profiles).map_err(|e| write_error(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
        fs::write(&self.path, yaml).map_err(|e| write_error(e.to_string()))
    }
}
