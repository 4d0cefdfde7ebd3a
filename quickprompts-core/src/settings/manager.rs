use std::fs;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::settings::config::Settings;
use crate::storage::error::StorageError;
use crate::storage::prompts::default_data_dir;

const SETTINGS_FILE: &str = "settings.json";

/// Non-secret settings, shared across the process.
///
/// The Arc<Mutex<..>> ensures every component that asks for settings gets
/// the same instance rather than its own diverging copy.
#[derive(Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
    inner: Arc<Mutex<Settings>>,
}

impl SettingsManager {
    /// Create a settings manager at the default location.
    pub fn new() -> Result<Self, StorageError> {
        Self::from_path(default_data_dir()?.join(SETTINGS_FILE))
    }

    /// Create a settings manager storing under a specific directory.
    pub fn in_dir(dir: &Path) -> Result<Self, StorageError> {
        Self::from_path(dir.join(SETTINGS_FILE))
    }

    /// Create a settings manager from a specific path.
    pub fn from_path(path: PathBuf) -> Result<Self, StorageError> {
        let loaded = Self::load_from_file_with_backup(&path)?;
        Ok(Self {
            settings_path: path,
            inner: Arc::new(Mutex::new(loaded)),
        })
    }

    /// Load settings from a JSON file. A missing file yields defaults; a
    /// corrupt one is moved aside to a `.backup` and replaced with defaults.
    fn load_from_file_with_backup(path: &Path) -> Result<Settings, StorageError> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(path)?;
        match serde_json::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(path = ?path, error = %e, "corrupt settings, resetting to defaults");
                let backup_path = path.with_extension("json.backup");
                fs::rename(path, &backup_path)?;

                let defaults = Settings::default();
                Self::write(path, &defaults)?;
                Ok(defaults)
            }
        }
    }

    /// Get the in-memory settings.
    pub fn settings(&self) -> Settings {
        self.inner.lock().unwrap().clone()
    }

    /// Update in-memory settings with a closure. Not saved to disk.
    pub fn update_setting<F>(&self, updater: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.inner.lock().unwrap();
        updater(guard.deref_mut());
    }

    /// Save provided settings. In-memory state only changes if the write
    /// succeeds.
    pub fn save_settings(&self, settings: Settings) -> Result<(), StorageError> {
        Self::write(&self.settings_path, &settings)?;
        *self.inner.lock().unwrap() = settings;
        Ok(())
    }

    /// Explicitly persist in-memory settings to disk.
    pub fn save(&self) -> Result<(), StorageError> {
        self.save_settings(self.settings())
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    fn write(path: &Path, settings: &Settings) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(settings)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
