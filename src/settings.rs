//! Game settings and preferences
//!
//! Loaded from an optional JSON file; every field falls back to its default
//! so partial files are fine.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::tuning::Tuning;

/// Failure to read or write a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window / terminal title
    pub title: String,
    /// Logical screen size the simulation runs in
    pub screen_width: f32,
    pub screen_height: f32,
    /// Driver loop frame rate
    pub target_fps: u32,
    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,

    // === Debug ===
    /// Start sessions with hitbox outlines visible
    pub debug_overlay: bool,
    /// Let the idle-mode pilot play
    pub autopilot: bool,

    /// Gameplay balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Skyhop".to_string(),
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            target_fps: TARGET_FPS,
            seed: None,

            debug_overlay: false,
            autopilot: false,

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Read settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Logical screen size as a vector
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Frame duration for the configured frame rate
    pub fn frame_seconds(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    fn sanitized(mut self) -> Self {
        if !self.screen_width.is_finite() || self.screen_width <= 0.0 {
            log::warn!("settings: screen_width = {} is invalid", self.screen_width);
            self.screen_width = SCREEN_WIDTH;
        }
        if !self.screen_height.is_finite() || self.screen_height <= 0.0 {
            log::warn!("settings: screen_height = {} is invalid", self.screen_height);
            self.screen_height = SCREEN_HEIGHT;
        }
        if self.target_fps == 0 {
            self.target_fps = TARGET_FPS;
        }
        self.tuning = self.tuning.sanitized();
        self
    }
}
