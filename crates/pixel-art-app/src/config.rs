//! Configuration for the pixel-art viewer.
//!
//! Loads `~/.config/pixel-art/config.toml` (or an explicit `--config` path)
//! with defaults for anything missing.

use std::path::{Path, PathBuf};

use pixel_art_core::{PixelArtSettings, Sampler};
use serde::{Deserialize, Serialize};

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial inner width in logical pixels
    pub width: u32,
    /// Initial inner height in logical pixels
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Pixel Art".to_string(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub filter: PixelArtSettings,
    pub sampler: Sampler,
    pub window: WindowConfig,
}

impl Config {
    /// Get the config directory path (~/.config/pixel-art)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("pixel-art"))
    }

    /// Get the config file path (~/.config/pixel-art/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load config from `explicit` or the default path, or return defaults
    /// if it is missing or unreadable.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let Some(path) = Self::config_path() else {
                    log::info!("Could not determine config path, using defaults");
                    return Self::default();
                };
                if !path.exists() {
                    log::info!("Config file not found at {:?}, using defaults", path);
                    return Self::default();
                }
                path
            }
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read config {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Parse TOML, replacing out-of-range filter settings with defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(contents)?;
        if let Err(e) = config.filter.validate() {
            log::warn!("Invalid [filter] settings ({}), using defaults", e);
            config.filter = PixelArtSettings::default();
        }
        Ok(config)
    }
}
