use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest accepted view distance, in chunks.
pub const MAX_VIEW_DISTANCE: u32 = 32;

/// World and session settings, loaded from RON. Missing fields take their
/// defaults, so `()` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for the default terrain generator.
    pub seed: u64,
    /// Chunks kept loaded around a streaming center (Chebyshev radius).
    pub view_distance: u32,
    /// Generate absent chunks on request.
    pub auto_generate: bool,
    /// Maximum chunks generated per streaming update.
    pub load_budget: u32,
    /// Simulation ticks per second.
    pub tick_rate: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            view_distance: 4,
            auto_generate: true,
            load_budget: 8,
            tick_rate: 20.0,
        }
    }
}

impl WorldConfig {
    /// Parse and validate a RON config string.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: WorldConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.view_distance == 0 {
            return Err(ConfigError::Invalid("view_distance must be at least 1".into()));
        }
        if self.view_distance > MAX_VIEW_DISTANCE {
            return Err(ConfigError::Invalid(format!(
                "view_distance must be at most {MAX_VIEW_DISTANCE}, got {}",
                self.view_distance
            )));
        }
        if !(self.tick_rate > 0.0 && self.tick_rate.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "tick_rate must be positive, got {}",
                self.tick_rate
            )));
        }
        Ok(())
    }

    /// Seconds per simulation tick.
    pub fn tick_interval(&self) -> f32 {
        1.0 / self.tick_rate
    }
}
