//! Game settings
//!
//! Stored as JSON next to the binary. Missing fields take their defaults, so
//! a partial file only overrides what it names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DIFFICULTY, TARGET_FPS};
use crate::platform::PlatformError;

/// Runtime configuration for a play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Starting difficulty (1-10)
    pub difficulty: u8,
    /// Fixed world seed; a time-based seed is used when absent
    pub seed: Option<u64>,
    /// Frame cap
    pub target_fps: u32,

    // === Pauses ===
    /// Show the welcome banner before the first frame
    pub show_welcome: bool,
    pub welcome_pause_ms: u64,
    /// Blocking pause after a collision
    pub game_over_pause_ms: u64,

    /// Stop after this many frames (headless demo runs)
    pub max_frames: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            seed: None,
            target_fps: TARGET_FPS,

            show_welcome: true,
            welcome_pause_ms: 2000,
            game_over_pause_ms: 2000,

            max_frames: None,
        }
    }
}

impl Settings {
    /// Milliseconds available per frame at the target rate
    pub fn frame_budget_ms(&self) -> u64 {
        1000 / u64::from(self.target_fps.max(1))
    }

    pub fn from_json(json: &str) -> Result<Self, PlatformError> {
        serde_json::from_str(json).map_err(|e| PlatformError::Settings(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, PlatformError> {
        serde_json::to_string_pretty(self).map_err(|e| PlatformError::Settings(e.to_string()))
    }

    /// Load settings, surfacing read and parse errors
    pub fn try_load_from(path: impl AsRef<Path>) -> Result<Self, PlatformError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| PlatformError::Settings(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        match Self::try_load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.as_ref().display());
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), PlatformError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .map_err(|e| PlatformError::Settings(format!("{}: {}", path.display(), e)))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
