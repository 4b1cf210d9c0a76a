// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON under the platform config directory
//! (`~/.config/photobooth/config.json` on Linux). A missing file means
//! defaults; unknown or missing fields fall back to their defaults too.

use crate::app::state::CaptureMode;
use crate::constants::{caption, card, countdown};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Border around the photo (left, top, right)
    pub border_size: u32,
    /// Caption band below the photo
    pub bottom_border_size: u32,
    /// First number of the countdown
    pub countdown_seconds: u32,
    /// Milliseconds between countdown ticks
    pub tick_millis: u64,
    /// Filter selected at startup (preset name or raw expression)
    pub default_filter: String,
    /// Capture mode selected at startup
    pub default_mode: CaptureMode,
    /// Mirror photos horizontally (selfie mode)
    pub mirror: bool,
    /// Where the directory gallery writes photos
    pub output_dir: Option<PathBuf>,
    /// Caption font family list
    pub caption_font_family: String,
    /// Caption font size in pixels
    pub caption_font_size: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            border_size: card::BORDER_SIZE,
            bottom_border_size: card::BOTTOM_BORDER_SIZE,
            countdown_seconds: countdown::START_SECONDS,
            tick_millis: countdown::TICK.as_millis() as u64,
            default_filter: "none".to_string(),
            default_mode: CaptureMode::Single,
            mirror: true, // Default to mirrored (selfie mode)
            output_dir: None,
            caption_font_family: caption::FONT_FAMILY.to_string(),
            caption_font_size: caption::FONT_SIZE,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("photobooth").join("config.json"))
    }

    /// Load from `path`, using defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load from the default location, or defaults when there is none
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Write to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Time between countdown ticks
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Directory the gallery writes to: configured, else `~/Pictures/photobooth`
    pub fn photo_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("photobooth")
        })
    }
}
