//! Simulation tuning
//!
//! Loaded from an optional JSON file; any missing field keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tuning knobs for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the next-bubble color draws
    pub seed: u64,
    /// Projectile speed in field units per tick
    pub projectile_speed: f32,
    /// Ticks between a landed shot and the next allowed shot
    pub settle_ticks: u32,
    /// Ticks per shake half-cycle
    pub shake_half_cycle_ticks: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed_b0b1,
            projectile_speed: PROJECTILE_SPEED,
            settle_ticks: SETTLE_TICKS,
            shake_half_cycle_ticks: SHAKE_HALF_CYCLE_TICKS,
        }
    }
}

impl Settings {
    /// Parse settings; out-of-range values fall back to their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Replace unusable knobs with their defaults
    ///
    /// The projectile must move (positive, finite) and must not travel a full
    /// bubble diameter per tick, or it could skip past bubbles between checks.
    pub fn sanitized(mut self) -> Self {
        let speed = self.projectile_speed;
        if !(speed.is_finite() && speed > 0.0 && speed < BUBBLE_DIAMETER) {
            log::warn!(
                "Projectile speed {} out of range (0, {}), using {}",
                speed,
                BUBBLE_DIAMETER,
                PROJECTILE_SPEED
            );
            self.projectile_speed = PROJECTILE_SPEED;
        }
        self
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
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

    /// Same settings with a different RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "settle_ticks": 9 }"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.settle_ticks, 9);
        assert_eq!(settings.projectile_speed, PROJECTILE_SPEED);
        assert_eq!(settings.shake_half_cycle_ticks, SHAKE_HALF_CYCLE_TICKS);
    }

    #[test]
    fn test_unusable_projectile_speed_falls_back() {
        for speed in ["0.0", "-10.0", "36.0", "1e9"] {
            let json = format!(r#"{{ "projectile_speed": {speed} }}"#);
            let settings = Settings::from_json(&json).unwrap();
            assert_eq!(settings.projectile_speed, PROJECTILE_SPEED, "speed {speed}");
        }

        let nan = Settings {
            projectile_speed: f32::NAN,
            ..Settings::default()
        };
        assert_eq!(nan.sanitized().projectile_speed, PROJECTILE_SPEED);
    }

    #[test]
    fn test_usable_projectile_speed_kept() {
        let settings = Settings::from_json(r#"{ "projectile_speed": 20.0 }"#).unwrap();
        assert_eq!(settings.projectile_speed, 20.0);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/definitely/not/here/settings.json"));
        assert_eq!(settings, Settings::default());
    }
}
