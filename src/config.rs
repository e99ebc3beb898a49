//! Environment tuning
//!
//! Persisted separately from game saves in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Tunable parameters of a [`crate::GameEnvironment`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvConfig {
    /// Full track width; the squad stays within half of it either side of 0
    pub track_width: f64,
    /// Forward speed in units per second
    pub speed: f64,
    /// Distance that wins the episode
    pub goal_distance: f64,
    /// Seconds per simulation step
    pub tick_dt: f64,
    /// Squad size after `reset`
    pub start_soldiers: u32,
    /// Gate pairs and zombie clusters spawned by `reset`
    pub initial_spawns: usize,
    /// Spawn more once the last gate is closer than this
    pub spawn_lookahead: f64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            track_width: TRACK_WIDTH,
            speed: SQUAD_SPEED,
            goal_distance: GOAL_DISTANCE,
            tick_dt: SIM_DT,
            start_soldiers: START_SOLDIERS,
            initial_spawns: INITIAL_SPAWNS,
            spawn_lookahead: SPAWN_LOOKAHEAD,
        }
    }
}

impl EnvConfig {
    /// Parse and validate a JSON config; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Distance covered per step
    pub fn step_distance(&self) -> f64 {
        self.speed * self.tick_dt
    }

    /// Longest step that still lands inside every gate trigger window and
    /// zombie contact window
    pub fn max_step_distance() -> f64 {
        2.0 * GATE_TOLERANCE.min(ZOMBIE_TOLERANCE)
    }

    /// Check that the environment can run with these values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("trackWidth", self.track_width),
            ("speed", self.speed),
            ("goalDistance", self.goal_distance),
            ("tickDt", self.tick_dt),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid { field });
            }
        }
        if !self.spawn_lookahead.is_finite() || self.spawn_lookahead < 0.0 {
            return Err(ConfigError::Invalid {
                field: "spawnLookahead",
            });
        }
        if self.start_soldiers == 0 || self.start_soldiers > MAX_SOLDIERS {
            return Err(ConfigError::StartSoldiers {
                count: self.start_soldiers,
                max: MAX_SOLDIERS,
            });
        }

        let step = self.step_distance();
        let limit = Self::max_step_distance();
        if step >= limit {
            return Err(ConfigError::StepTooLong { step, limit });
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gate_rush_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded environment config from LocalStorage");
                        return config;
                    }
                    Err(err) => log::warn!("Ignoring stored config: {}", err),
                }
            }
        }

        log::info!("Using default environment config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Environment config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvConfig::default();
        assert_eq!(config.track_width, 10.0);
        assert_eq!(config.goal_distance, 500.0);
        assert_eq!(config.start_soldiers, 10);
        assert!((config.step_distance() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EnvConfig::from_json(r#"{ "goalDistance": 120.0, "speed": 30.0 }"#).unwrap();
        assert_eq!(config.goal_distance, 120.0);
        assert_eq!(config.speed, 30.0);
        assert_eq!(config.track_width, TRACK_WIDTH);
        assert_eq!(config.initial_spawns, INITIAL_SPAWNS);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            EnvConfig::from_json("{ goalDistance: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        for (json, expected) in [
            (r#"{ "trackWidth": -10.0 }"#, "trackWidth"),
            (r#"{ "trackWidth": 0.0 }"#, "trackWidth"),
            (r#"{ "speed": -1.0 }"#, "speed"),
            (r#"{ "goalDistance": 0.0 }"#, "goalDistance"),
            (r#"{ "tickDt": 0.0 }"#, "tickDt"),
            (r#"{ "spawnLookahead": -5.0 }"#, "spawnLookahead"),
        ] {
            match EnvConfig::from_json(json) {
                Err(ConfigError::Invalid { field }) => assert_eq!(field, expected, "{json}"),
                other => panic!("{json} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let config = EnvConfig {
            tick_dt: f64::NAN,
            ..EnvConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "tickDt" })
        ));
    }

    #[test]
    fn test_start_soldiers_bounds() {
        assert!(matches!(
            EnvConfig::from_json(r#"{ "startSoldiers": 0 }"#),
            Err(ConfigError::StartSoldiers { count: 0, .. })
        ));
        assert!(EnvConfig::from_json(r#"{ "startSoldiers": 501 }"#).is_err());
        assert!(EnvConfig::from_json(r#"{ "startSoldiers": 500 }"#).is_ok());
    }

    #[test]
    fn test_step_distance_limit() {
        // 2.0 * 0.5 lands exactly on the limit
        assert!(matches!(
            EnvConfig::from_json(r#"{ "speed": 2.0, "tickDt": 0.5 }"#),
            Err(ConfigError::StepTooLong { .. })
        ));
        assert!(EnvConfig::from_json(r#"{ "speed": 120.0 }"#).is_err());
        let config = EnvConfig::from_json(r#"{ "speed": 1.9, "tickDt": 0.5 }"#).unwrap();
        assert!(config.step_distance() < EnvConfig::max_step_distance());
        assert!(EnvConfig::default().validate().is_ok());
    }
}
