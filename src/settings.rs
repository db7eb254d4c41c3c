//! Host settings
//!
//! Persisted as JSON next to the progress file. Unknown or missing fields fall
//! back to defaults, and an unreadable file means default settings.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{AUTOSAVE_INTERVAL_SECS, TICK_INTERVAL_MS, VIEWPORT_COLS, VIEWPORT_ROWS};
use crate::persistence::{JsonFileStore, PersistenceError};
use crate::sim::RestartPolicy;

/// File name inside the data directory
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Milliseconds between simulation ticks
    pub tick_interval_ms: u64,
    /// Seconds between opportunistic progress saves
    pub autosave_interval_secs: u64,

    // === Viewport ===
    /// Terminal columns available to the board
    pub viewport_cols: i32,
    /// Terminal rows available to the board
    pub viewport_rows: i32,

    /// Fixed RNG seed for reproducible runs (None = entropy)
    pub seed: Option<u64>,
    /// What Restart does after a Space Invaders game over
    pub invaders_restart: RestartPolicy,
    /// Override for the platform data directory
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            autosave_interval_secs: AUTOSAVE_INTERVAL_SECS,
            viewport_cols: VIEWPORT_COLS,
            viewport_rows: VIEWPORT_ROWS,
            seed: None,
            invaders_restart: RestartPolicy::default(),
            data_dir: None,
        }
    }
}

impl Settings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }

    /// Directory holding settings and progress
    pub fn resolve_data_dir(&self) -> Result<PathBuf, PersistenceError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => JsonFileStore::default_dir(),
        }
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load from the platform data directory
    pub fn load_default() -> Self {
        match JsonFileStore::default_dir() {
            Ok(dir) => Self::load(&dir.join(SETTINGS_FILE)),
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
