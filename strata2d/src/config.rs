use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collision::BoxCollisionOptions;
use crate::error::ConfigError;
use crate::object::YAxisOrientation;
use crate::render::Colour;

/// Tunables for the scene simulation.
///
/// Every field has a default, so a JSON file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of one simulation step in milliseconds.
    pub ms_per_update: f64,
    /// Nudge attempts a bitmap layer makes before giving up on an object.
    pub max_resolve_attempts: u32,
    /// Colour of solid pixels in collision bitmaps.
    pub ink: Colour,
    /// Orientation given to objects whose description does not name one.
    pub default_orientation: YAxisOrientation,
    pub box_collision: BoxCollisionOptions,
    /// Size used by headless targets.
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ms_per_update: 16.0,
            max_resolve_attempts: 10,
            ink: Colour::BLACK,
            default_orientation: YAxisOrientation::TopZero,
            box_collision: BoxCollisionOptions::default(),
            viewport_width: 640,
            viewport_height: 480,
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn with_ms_per_update(mut self, ms: f64) -> Self {
        self.ms_per_update = ms;
        self
    }

    #[must_use]
    pub fn with_max_resolve_attempts(mut self, attempts: u32) -> Self {
        self.max_resolve_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_ink(mut self, ink: Colour) -> Self {
        self.ink = ink;
        self
    }

    #[must_use]
    pub fn with_default_orientation(mut self, orientation: YAxisOrientation) -> Self {
        self.default_orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_box_collision(mut self, options: BoxCollisionOptions) -> Self {
        self.box_collision = options;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Parses and validates a JSON config. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects a non-positive step and zero resolve attempts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ms_per_update.is_finite() && self.ms_per_update > 0.0) {
            return Err(ConfigError::Invalid {
                field: "ms_per_update",
                reason: format!("{} is not a positive duration", self.ms_per_update),
            });
        }
        if self.max_resolve_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "max_resolve_attempts",
                reason: "at least one attempt is required".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimulationConfig::from_json_str(r#"{"max_resolve_attempts": 3}"#).unwrap();
        assert_eq!(config.max_resolve_attempts, 3);
        assert_eq!(config.ms_per_update, 16.0);
        assert_eq!(config.default_orientation, YAxisOrientation::TopZero);
    }

    #[test]
    fn zero_step_is_rejected() {
        let err = SimulationConfig::from_json_str(r#"{"ms_per_update": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "ms_per_update",
                ..
            }
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ink": {{"r": 255, "g": 0, "b": 0}}, "viewport_width": 320}}"#).unwrap();
        let config = SimulationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.ink, Colour::rgb(255, 0, 0));
        assert_eq!(config.viewport_width, 320);
        assert_eq!(config.viewport_height, 480);
    }

    #[test]
    fn builders_chain() {
        let config = SimulationConfig::default()
            .with_ms_per_update(10.0)
            .with_viewport(100, 50)
            .with_default_orientation(YAxisOrientation::BottomZero);
        assert_eq!(config.ms_per_update, 10.0);
        assert_eq!((config.viewport_width, config.viewport_height), (100, 50));
        assert!(config.validate().is_ok());
    }
}
