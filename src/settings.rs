//! Game settings
//!
//! Every tunable constant of the simulation. A session takes its own copy at
//! construction, so settings never change mid-episode.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// Simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub width: f32,
    pub height: f32,

    // === Bird ===
    /// Fixed horizontal position of the bird's left edge
    pub bird_x: f32,
    /// Side of the bird's square hitbox
    pub bird_size: f32,
    pub gravity: f32,
    pub flap_impulse: f32,

    // === Pipes ===
    pub pipe_width: f32,
    /// Leftward travel per tick
    pub pipe_speed: f32,
    /// Vertical opening of every pipe
    pub gap_height: f32,
    /// Minimum distance between the gap and the ceiling/floor
    pub gap_margin: f32,
    /// Travel since the last spawn that triggers the next one
    pub spawn_distance: f32,

    // === Observation ===
    pub velocity_scale: f32,

    // === Rewards ===
    pub reward_alive: f32,
    pub reward_pass: f32,
    /// Terminal reward when no pipe lies ahead of the bird
    pub reward_crash_max: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,

            bird_x: BIRD_X,
            bird_size: BIRD_SIZE,
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,

            pipe_width: PIPE_WIDTH,
            pipe_speed: PIPE_SPEED,
            gap_height: PIPE_GAP,
            gap_margin: GAP_MARGIN,
            spawn_distance: SPAWN_DISTANCE,

            velocity_scale: VELOCITY_SCALE,

            reward_alive: REWARD_ALIVE,
            reward_pass: REWARD_PASS,
            reward_crash_max: REWARD_CRASH_MAX,
        }
    }
}

impl Settings {
    /// Lowest gap top a spawned pipe may get
    pub fn min_gap_top(&self) -> f32 {
        self.gap_margin
    }

    /// Highest gap top a spawned pipe may get
    pub fn max_gap_top(&self) -> f32 {
        self.height - self.gap_margin - self.gap_height
    }

    /// Check that the constants describe a playable, well-defined simulation
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("bird_x", self.bird_x),
            ("bird_size", self.bird_size),
            ("gravity", self.gravity),
            ("flap_impulse", self.flap_impulse),
            ("pipe_width", self.pipe_width),
            ("pipe_speed", self.pipe_speed),
            ("gap_height", self.gap_height),
            ("gap_margin", self.gap_margin),
            ("spawn_distance", self.spawn_distance),
            ("velocity_scale", self.velocity_scale),
            ("reward_alive", self.reward_alive),
            ("reward_pass", self.reward_pass),
            ("reward_crash_max", self.reward_crash_max),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimError::InvalidSettings(format!("{name} must be finite")));
        }

        // Divisors and per-tick rates must be strictly positive
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("bird_size", self.bird_size),
            ("pipe_width", self.pipe_width),
            ("pipe_speed", self.pipe_speed),
            ("gap_height", self.gap_height),
            ("spawn_distance", self.spawn_distance),
            ("velocity_scale", self.velocity_scale),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "{name} must be positive, got {value}"
            )));
        }

        if self.gravity < 0.0 {
            return Err(SimError::InvalidSettings(format!(
                "gravity must not be negative, got {}",
                self.gravity
            )));
        }
        if self.gap_margin < 0.0 {
            return Err(SimError::InvalidSettings(format!(
                "gap_margin must not be negative, got {}",
                self.gap_margin
            )));
        }
        if self.max_gap_top() < self.min_gap_top() {
            return Err(SimError::InvalidSettings(format!(
                "gap of {} with margin {} does not fit a playfield of height {}",
                self.gap_height, self.gap_margin, self.height
            )));
        }
        if self.bird_x < 0.0 || self.bird_x + self.bird_size > self.width {
            return Err(SimError::InvalidSettings(format!(
                "bird at x={} does not fit a playfield of width {}",
                self.bird_x, self.width
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.min_gap_top(), 100.0);
        assert_eq!(settings.max_gap_top(), 380.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "gravity": 0.25, "pipe_speed": 2.0 }"#).unwrap();
        assert_eq!(settings.gravity, 0.25);
        assert_eq!(settings.pipe_speed, 2.0);
        assert_eq!(settings.height, PLAYFIELD_HEIGHT);
        assert_eq!(settings.reward_pass, REWARD_PASS);
    }

    #[test]
    fn test_rejects_zero_divisor() {
        let settings = Settings {
            velocity_scale: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SimError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_rejects_gap_that_does_not_fit() {
        let settings = Settings {
            gap_height: 450.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        let settings = Settings {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SimError::Json(_))
        ));
    }

    #[test]
    fn test_save_load_file() {
        let path = std::env::temp_dir().join(format!("flappy_rl_settings_{}.json", std::process::id()));
        let settings = Settings {
            spawn_distance: 240.0,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }
}
