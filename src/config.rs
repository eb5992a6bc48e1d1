//! Configuration management for todo-core.
//!
//! This module handles the `.todo-core/config.yaml` file, which stores the
//! Pomodoro settings, the database location and the debug logging switch.

use crate::error::Result;
use crate::paths;
use crate::pomodoro::PomodoroSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file path relative to the base directory.
pub const CONFIG_FILE_PATH: &str = ".todo-core/config.yaml";

/// User configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Pomodoro durations.
    #[serde(default)]
    pub pomodoro: PomodoroSettings,

    /// Append every applied store event to `events.jsonl`.
    #[serde(default)]
    pub debug_logging: bool,

    /// Where the local database lives. None means the default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Owner id used by the command-line front end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl AppConfig {
    /// Load config from a base directory, returning None if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or holds
    /// invalid Pomodoro settings.
    pub fn load_from(base_dir: &Path) -> Result<Option<Self>> {
        let config_path = Self::config_path(base_dir);
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.pomodoro.validate()?;
        Ok(Some(config))
    }

    /// Load config from a base directory, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_or_default(base_dir: &Path) -> Result<Self> {
        Ok(Self::load_from(base_dir)?.unwrap_or_default())
    }

    /// Save config to a base directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, base_dir: &Path) -> Result<()> {
        let config_path = Self::config_path(base_dir);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Get the config file path for a base directory.
    pub fn config_path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE_PATH)
    }

    /// The database path: the configured one, else the default under
    /// `base_dir`.
    #[must_use]
    pub fn resolve_db_path(&self, base_dir: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| paths::data_dir_in(base_dir).join(paths::DATABASE_FILENAME))
    }
}
