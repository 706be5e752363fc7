//! On-disk configuration for the showcase host.
//!
//! Loading is best-effort: a missing or malformed file falls back to the
//! defaults, never to an error the host has to handle.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use vitrine_core::{AnimationSpeed, BackgroundKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Variant shown at startup.
    pub background: BackgroundKind,
    pub speed: AnimationSpeed,
    /// Host frame pacing.
    pub fps: u32,
    /// RNG seed; a fixed seed reproduces the exact same animation.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            background: BackgroundKind::Aurora,
            speed: AnimationSpeed::Medium,
            fps: 30,
            seed: 42,
        }
    }
}

impl Config {
    /// Load from `<config-dir>/vitrine/config.toml`, falling back to the
    /// defaults when the file is absent or unreadable.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => {
                    debug!("loaded config from {}", path.display());
                    config
                }
                Err(err) => {
                    warn!("ignoring malformed {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "vitrine").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let config = Config {
            background: BackgroundKind::Galaxy,
            speed: AnimationSpeed::Fast,
            fps: 60,
            seed: 7,
        };
        let text = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = toml::from_str("background = \"night-sky\"").unwrap();
        assert_eq!(config.background, BackgroundKind::NightSky);
        assert_eq!(config.fps, Config::default().fps);
        assert_eq!(config.speed, AnimationSpeed::Medium);
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(toml::from_str::<Config>("fps = \"fast\"").is_err());
    }
}
