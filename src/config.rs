// Settings persistence - Playback speed and master volume
//
// Stored as RON under the user config directory. Missing or unreadable
// settings fall back to defaults; the file is rewritten whenever the user
// changes a setting.

use crate::game::speed::PlaybackSpeed;
use ron::{from_str as ron_from_str, to_string as ron_to_string};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no user config directory available")]
    NoConfigDir,
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config format: {0}")]
    Format(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub speed: PlaybackSpeed,
    pub volume: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            speed: PlaybackSpeed::default(),
            volume: 0.5,
        }
    }
}

impl GameConfig {
    /// Location of the settings file for this user.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("simon_says").join("settings.ron"))
    }

    /// Load the user settings, falling back to defaults on any failure.
    pub fn load() -> Self {
        Self::default_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let mut config: GameConfig =
            ron_from_str(&data).map_err(|e| ConfigError::Format(e.to_string()))?;
        config.volume = config.volume.clamp(0.0, 1.0);
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = ron_to_string(self).map_err(|e| ConfigError::Format(e.to_string()))?;
        fs::write(path, data)?;
        Ok(())
    }
}
