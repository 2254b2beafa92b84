//! Game settings and preferences
//!
//! Persisted as JSON: LocalStorage in the browser, a file in the platform
//! config directory natively. Missing or unreadable settings fall back to
//! defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::sim::particles::MAX_PARTICLES;
use crate::tuning::{self, Difficulty, SpeedPolicy};

#[cfg(not(target_arch = "wasm32"))]
use crate::persistence::StoreError;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty tier (gravity and base speed)
    pub difficulty: Difficulty,
    /// How scroll speed evolves over a run
    pub speed_policy: SpeedPolicy,
    /// Player speed control; pins the scroll speed while set
    pub speed_override: Option<f32>,
    pub viewport: Viewport,
    /// Particle effects (explosions, trails, sparkles)
    pub particles: bool,
    /// Score that wins the game
    pub win_score: f64,
    /// Fixed RNG seed; a fresh one per run when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            speed_policy: SpeedPolicy::ScoreScaled,
            speed_override: None,
            viewport: Viewport::default(),
            particles: true,
            win_score: tuning::WIN_SCORE,
            seed: None,
        }
    }
}

impl Settings {
    /// Effective particle cap per engine
    pub fn max_particles(&self) -> usize {
        if !self.particles { 0 } else { MAX_PARTICLES }
    }

    /// Drop values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        if let Some(speed) = self.speed_override {
            if !tuning::valid_speed_control(speed) {
                log::warn!("Ignoring out-of-range speed setting {}", speed);
                self.speed_override = None;
            }
        }
        let viewport_ok = self.viewport.width.is_finite()
            && self.viewport.height.is_finite()
            && self.viewport.width > 0.0
            && self.viewport.height > 0.0;
        if !viewport_ok {
            log::warn!("Ignoring invalid viewport {:?}", self.viewport);
            self.viewport = Viewport::default();
        }
        if !self.win_score.is_finite() || self.win_score <= 0.0 {
            self.win_score = tuning::WIN_SCORE;
        }
        self
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sky_aviator_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str::<Settings>(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings.sanitized();
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// `settings.json` in the platform config directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let dirs = directories::ProjectDirs::from("", "", crate::persistence::APP_DIR)
            .ok_or(StoreError::Unavailable)?;
        Ok(dirs.config_dir().join("settings.json"))
    }

    /// Read settings from a JSON file. Missing fields take their defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        Ok(settings.sanitized())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load from the default path, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let loaded = Self::default_path().and_then(|path| {
            if path.exists() {
                Self::load_from(&path).map(Some)
            } else {
                Ok(None)
            }
        });
        match loaded {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from disk");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        match Self::default_path().and_then(|path| self.save_to(&path)) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.viewport.width, 1280.0);
        assert_eq!(settings.viewport.height, 720.0);
        assert_eq!(settings.win_score, 800.0);
        assert_eq!(settings.max_particles(), MAX_PARTICLES);
    }

    #[test]
    fn test_particles_off_means_zero_cap() {
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"difficulty":"hard"}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.speed_policy, SpeedPolicy::ScoreScaled);
        assert!(settings.particles);
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        assert!(serde_json::from_str::<Settings>(r#"{"difficulty":"insane"}"#).is_err());
    }

    #[test]
    fn test_sanitize_drops_bad_values() {
        let settings = Settings {
            speed_override: Some(50.0),
            viewport: Viewport {
                width: 0.0,
                height: 720.0,
            },
            win_score: -1.0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.speed_override, None);
        assert_eq!(settings.viewport, Viewport::default());
        assert_eq!(settings.win_score, tuning::WIN_SCORE);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("sky-aviator-settings-{}", std::process::id()));
        let path = dir.join("settings.json");
        let settings = Settings {
            difficulty: Difficulty::Easy,
            seed: Some(7),
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
        let _ = std::fs::remove_dir_all(dir);
    }
}
