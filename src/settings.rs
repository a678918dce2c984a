//! Game settings and tuning
//!
//! Loaded from a JSON file on native builds. Every field has a default so a
//! partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while reading or validating a settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{name} must be below one tile per tick (got {value})")]
    TooFast { name: &'static str, value: f32 },
    #[error("collision band must satisfy 0 <= top < bottom <= 1 (got {top}..{bottom})")]
    Band { top: f32, bottom: f32 },
    #[error("{name} must be within 0..=1 (got {value})")]
    OutOfRange { name: &'static str, value: f32 },
    #[error("{0} must be positive")]
    NotPositive(&'static str),
}

/// Physics tuning. Distances are fractions of a tile, speeds are tiles per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    /// Target horizontal speed while walking
    pub move_speed: f32,
    /// Upward impulse applied on jump
    pub jump_strength: f32,
    /// Added to vertical velocity every tick (balls get half)
    pub gravity: f32,
    /// Symmetric vertical speed bound
    pub terminal_velocity: f32,
    /// Speed of a freshly kicked ball
    pub kick_speed: f32,
    /// Per-tick blend toward target horizontal speed
    pub blend: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub ball_radius: f32,
    /// Upper edge of the horizontal collision band (fraction of actor height)
    pub band_top: f32,
    /// Lower edge of the horizontal collision band
    pub band_bottom: f32,
    /// Ball-vs-platform restitution
    pub bounce_restitution: f32,
    /// Ball-vs-ball restitution
    pub pair_restitution: f32,
    /// Bound on the random spin given to new balls (radians per tick)
    pub max_spin: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            move_speed: 0.12,
            jump_strength: 0.42,
            gravity: 0.025,
            terminal_velocity: 0.5,
            kick_speed: 0.35,
            blend: BLEND_FACTOR,
            player_width: 0.8,
            player_height: 1.2,
            ball_radius: 0.25,
            band_top: 0.25,
            band_bottom: 0.75,
            bounce_restitution: BOUNCE_RESTITUTION,
            pair_restitution: PAIR_RESTITUTION,
            max_spin: 0.2,
        }
    }
}

/// Session rules enforced by the play phase
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub time_limit_ms: u64,
    pub max_balls: usize,
    pub ball_lifetime_ms: u64,
    pub bounce_sound_cooldown_ms: u64,
    /// Distance (in tiles) from the player centre at which coins and the goal are reached
    pub pickup_radius: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            time_limit_ms: TIME_LIMIT_MS,
            max_balls: MAX_BALLS,
            ball_lifetime_ms: BALL_LIFETIME_MS,
            bounce_sound_cooldown_ms: BOUNCE_SOUND_COOLDOWN_MS,
            pickup_radius: 0.75,
        }
    }
}

/// A level entry: key shown in the selector, bitmap path and music track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelEntry {
    pub key: String,
    pub path: String,
    #[serde(default)]
    pub music: Option<String>,
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: Physics,
    pub rules: Rules,

    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Content ===
    pub characters: Vec<String>,
    pub levels: Vec<LevelEntry>,

    /// Seed for ball spin
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: Physics::default(),
            rules: Rules::default(),

            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            characters: vec!["fox".to_string(), "frog".to_string(), "cat".to_string()],
            levels: Vec::new(),

            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Read and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Like [`Settings::load`] but falls back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Reject tunings that break the collision model.
    ///
    /// The resolver clamps after the move instead of sweeping, so nothing may
    /// travel a full tile in one tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        for (name, value) in [
            ("move_speed", p.move_speed),
            ("jump_strength", p.jump_strength),
            ("terminal_velocity", p.terminal_velocity),
            ("kick_speed", p.kick_speed),
        ] {
            if value.is_nan() || value >= 1.0 {
                return Err(ConfigError::TooFast { name, value });
            }
        }
        // Restitution above one would add energy on every bounce
        for (name, value) in [
            ("bounce_restitution", p.bounce_restitution),
            ("pair_restitution", p.pair_restitution),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }
        if !(0.0..1.0).contains(&p.band_top)
            || !(p.band_top < p.band_bottom && p.band_bottom <= 1.0)
        {
            return Err(ConfigError::Band {
                top: p.band_top,
                bottom: p.band_bottom,
            });
        }
        if self.viewport_height <= 0.0 {
            return Err(ConfigError::NotPositive("viewport_height"));
        }
        if self.rules.max_balls == 0 {
            return Err(ConfigError::NotPositive("max_balls"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "rules": { "max_balls": 5 }, "muted": true }"#).unwrap();
        assert_eq!(settings.rules.max_balls, 5);
        assert_eq!(settings.rules.time_limit_ms, TIME_LIMIT_MS);
        assert!(settings.muted);
        assert_eq!(settings.physics.band_top, 0.25);
    }

    #[test]
    fn test_rejects_tunneling_speeds() {
        let mut settings = Settings::default();
        settings.physics.terminal_velocity = 1.5;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::TooFast {
                name: "terminal_velocity",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_nan_speed() {
        let mut settings = Settings::default();
        settings.physics.move_speed = f32::NAN;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::TooFast {
                name: "move_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_energy_gaining_restitution() {
        let mut settings = Settings::default();
        settings.physics.bounce_restitution = 1.2;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::OutOfRange {
                name: "bounce_restitution",
                ..
            })
        ));

        let mut settings = Settings::default();
        settings.physics.pair_restitution = -0.1;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::OutOfRange {
                name: "pair_restitution",
                ..
            })
        ));

        let mut settings = Settings::default();
        settings.physics.pair_restitution = f32::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_band() {
        let mut settings = Settings::default();
        settings.physics.band_bottom = f32::NAN;
        assert!(matches!(settings.validate(), Err(ConfigError::Band { .. })));
    }

    #[test]
    fn test_rejects_inverted_band() {
        let mut settings = Settings::default();
        settings.physics.band_top = 0.8;
        settings.physics.band_bottom = 0.2;
        assert!(matches!(settings.validate(), Err(ConfigError::Band { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/nonexistent/coin-dash/settings.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
