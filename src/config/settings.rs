//! User preference management with XDG Base Directory compliance.
//!
//! Settings are stored as pretty-printed JSON in
//! `$XDG_CONFIG_HOME/formdesk/settings.json`.

use std::{
    env::var,
    fs::{create_dir_all, read_to_string, write},
    io::Error as StdError,
    path::PathBuf,
    time::Duration,
};

use {
    parking_lot::{RwLock, RwLockReadGuard},
    serde::{Deserialize, Serialize},
    serde_json::{Error as SerdeJsonError, from_str, to_string_pretty},
    thiserror::Error,
    tracing::debug,
};

use crate::state::{ActiveTab, UserRecord};

/// Error type for settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read or write settings file.
    #[error("IO error: {0}")]
    IoError(#[from] StdError),
    /// Failed to serialize or deserialize settings.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] SerdeJsonError),
    /// Invalid settings value.
    #[error("Invalid settings value: {reason}")]
    InvalidValue { reason: String },
}

/// Serializable user settings structure with default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// How long the "form submitted" notice stays visible, in milliseconds.
    pub notice_duration_ms: u64,
    /// Tab selected when the window opens.
    pub default_tab: ActiveTab,
    /// Record installed by the profile view's login button.
    pub mock_user: UserRecord,
    /// Initial window width in pixels.
    pub window_width: i32,
    /// Initial window height in pixels.
    pub window_height: i32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            notice_duration_ms: 3000,
            default_tab: ActiveTab::Form,
            mock_user: UserRecord::default(),
            window_width: 720,
            window_height: 640,
        }
    }
}

impl UserSettings {
    /// Notice display duration.
    #[must_use]
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }

    /// Checks that all values are usable.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidValue` naming the first offending value.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let reason = if self.notice_duration_ms == 0 {
            "notice_duration_ms must be greater than zero"
        } else if self.mock_user.name.trim().is_empty() {
            "mock_user.name must not be empty"
        } else if self.mock_user.email.trim().is_empty() {
            "mock_user.email must not be empty"
        } else if self.window_width <= 0 || self.window_height <= 0 {
            "window size must be positive"
        } else {
            return Ok(());
        };

        Err(SettingsError::InvalidValue {
            reason: reason.to_string(),
        })
    }
}

/// Handles loading, saving, and validation of user preferences.
#[derive(Debug)]
pub struct SettingsManager {
    /// Thread-safe user settings storage.
    settings: RwLock<UserSettings>,
    /// Path to the configuration file on disk.
    config_path: PathBuf,
}

impl SettingsManager {
    /// Creates a new settings manager with default config path.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be loaded from disk or
    /// fail validation.
    pub fn new() -> Result<Self, SettingsError> {
        Self::with_config_path(get_config_path())
    }

    /// Creates a new settings manager with a custom config path (for testing).
    ///
    /// # Arguments
    ///
    /// * `config_path` - Custom path for the settings file
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be loaded from disk or
    /// fail validation.
    pub fn with_config_path(config_path: PathBuf) -> Result<Self, SettingsError> {
        if let Some(parent) = config_path.parent() {
            create_dir_all(parent)?;
        }

        let settings: UserSettings = if config_path.exists() {
            debug!("Loading settings from existing file: {:?}", config_path);
            let contents = read_to_string(&config_path)?;
            from_str(&contents)?
        } else {
            debug!("Using default settings, no file at {:?}", config_path);
            UserSettings::default()
        };
        settings.validate()?;

        Ok(SettingsManager {
            settings: RwLock::new(settings),
            config_path,
        })
    }

    /// Gets the current settings.
    pub fn get_settings(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.settings.read()
    }

    /// Gets the configuration file path.
    pub fn get_config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Validates, applies and saves new settings.
    ///
    /// # Arguments
    ///
    /// * `new_settings` - New settings to apply.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the settings are invalid or cannot be
    /// saved to disk. Invalid settings are not applied.
    pub fn update_settings(&self, new_settings: UserSettings) -> Result<(), SettingsError> {
        new_settings.validate()?;
        *self.settings.write() = new_settings;
        self.save_settings()
    }

    /// Stores the main window size for the next start.
    ///
    /// Nothing is written when the size is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the size is invalid or cannot be saved.
    pub fn remember_window_size(&self, width: i32, height: i32) -> Result<(), SettingsError> {
        let mut current_settings = self.get_settings().clone();
        if current_settings.window_width == width && current_settings.window_height == height {
            return Ok(());
        }
        current_settings.window_width = width;
        current_settings.window_height = height;
        self.update_settings(current_settings)
    }

    fn save_settings(&self) -> Result<(), SettingsError> {
        debug!("Saving settings to file: {:?}", self.config_path);
        let contents = to_string_pretty(&*self.settings.read())?;
        write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Path to the configuration file following XDG conventions.
#[must_use]
pub fn get_config_path() -> PathBuf {
    let mut config_dir = get_xdg_config_home();
    config_dir.push("formdesk");
    config_dir.push("settings.json");
    config_dir
}

/// Uses `XDG_CONFIG_HOME` if set, otherwise `$HOME/.config`.
fn get_xdg_config_home() -> PathBuf {
    if let Ok(config_home) = var("XDG_CONFIG_HOME")
        && !config_home.is_empty()
    {
        return PathBuf::from(config_home);
    }

    if let Ok(home) = var("HOME") {
        let mut path = PathBuf::from(home);
        path.push(".config");
        return path;
    }

    PathBuf::from(".")
}
