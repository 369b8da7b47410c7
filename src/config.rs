//! Simulation Configuration
//!
//! Every ambient constant the simulation needs - gravity, world bounds,
//! spawn point, timing clamps - lives in one explicit structure passed
//! into factories at creation time. No globals, so tests can run fully
//! deterministic isolated worlds. Stored as RON, like level files.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    ValidationError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tuning constants for one simulation instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Downward acceleration, units/s^2 (y grows down)
    pub gravity: f32,
    /// Cap on downward speed, units/s
    pub terminal_velocity: f32,
    /// Small downward speed kept while grounded, prevents sub-pixel
    /// re-penetration jitter against the floor
    pub resting_velocity: f32,
    /// Upper bound on a single tick's delta time, seconds. An unclamped
    /// delta after a background pause could tunnel a fast body through a
    /// thin wall in one step.
    pub max_dt: f32,
    /// Playable world bounds (width, height)
    pub world_bounds: Vec2,
    /// Where the player factory places the player
    pub spawn_point: Vec2,
    /// Invulnerability window granted after a successful hit, seconds
    pub invuln_duration: f32,
    /// Player tuning
    pub player_speed: f32,
    pub player_jump_speed: f32,
    pub player_health: i32,
    pub player_attack_damage: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 1500.0,
            terminal_velocity: 900.0,
            resting_velocity: 10.0,
            max_dt: 1.0 / 30.0,
            world_bounds: Vec2::new(1280.0, 720.0),
            spawn_point: Vec2::new(64.0, 64.0),
            invuln_duration: 0.8,
            player_speed: 220.0,
            player_jump_speed: 560.0,
            player_health: 5,
            player_attack_damage: 1,
        }
    }
}

impl SimConfig {
    /// Load a config from a RON file.
    pub fn load(path: &Path) -> Result<SimConfig, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: SimConfig = ron::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (self.gravity, "gravity"),
            (self.terminal_velocity, "terminal_velocity"),
            (self.resting_velocity, "resting_velocity"),
            (self.max_dt, "max_dt"),
            (self.invuln_duration, "invuln_duration"),
            (self.player_speed, "player_speed"),
            (self.player_jump_speed, "player_jump_speed"),
        ];
        for (value, name) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if self.max_dt == 0.0 {
            return Err(ConfigError::ValidationError(
                "max_dt must be positive".into(),
            ));
        }
        if !self.world_bounds.x.is_finite() || !self.world_bounds.y.is_finite() {
            return Err(ConfigError::ValidationError(
                "world_bounds must be finite".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_gravity() {
        let config = SimConfig {
            gravity: -1.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_zero_max_dt() {
        let config = SimConfig {
            max_dt: 0.0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_ron_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.ron");

        let text = ron::ser::to_string(&SimConfig::default()).unwrap();
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(text.as_bytes()).unwrap();

        let loaded = SimConfig::load(&path).unwrap();
        assert_eq!(loaded.gravity, SimConfig::default().gravity);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.ron");
        std::fs::write(&path, "not ron at all {{{").unwrap();

        assert!(matches!(
            SimConfig::load(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
