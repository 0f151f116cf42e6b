/// Engine tunables, loadable from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::deck::EventMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every field is optional in RON; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chance in `[0, 1]` that an answer fails regardless of content.
    pub ineffective_chance: f64,
    /// Chance in `[0, 1]` that the injector runs after a turn.
    pub setback_turn_chance: f64,
    /// Percent in `[0, 100]` that an eligible setback actually strikes.
    pub setback_appear_percent: f64,
    pub setback_weight_divisor: u32,
    pub countdown_ticks: u32,
    pub health_decay_per_turn: i32,
    pub progress_base: i32,
    pub progress_score_divisor: i32,
    pub event_mode: EventMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ineffective_chance: 0.10,
            setback_turn_chance: 0.35,
            setback_appear_percent: 30.0,
            setback_weight_divisor: 5,
            countdown_ticks: 5,
            health_decay_per_turn: 5,
            progress_base: 15,
            progress_score_divisor: 5,
            event_mode: EventMode::Generated,
        }
    }
}

impl EngineConfig {
    pub fn load_from_ron(path: &Path) -> Result<EngineConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<EngineConfig, ConfigError> {
        let config: EngineConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.ineffective_chance) {
            return Err(ConfigError::Invalid(format!(
                "ineffective_chance {} outside [0, 1]",
                self.ineffective_chance
            )));
        }
        if !unit.contains(&self.setback_turn_chance) {
            return Err(ConfigError::Invalid(format!(
                "setback_turn_chance {} outside [0, 1]",
                self.setback_turn_chance
            )));
        }
        if !(0.0..=100.0).contains(&self.setback_appear_percent) {
            return Err(ConfigError::Invalid(format!(
                "setback_appear_percent {} outside [0, 100]",
                self.setback_appear_percent
            )));
        }
        if self.setback_weight_divisor == 0 || self.progress_score_divisor <= 0 {
            return Err(ConfigError::Invalid("divisors must be positive".to_string()));
        }
        if self.countdown_ticks == 0 {
            return Err(ConfigError::Invalid("countdown_ticks must be at least 1".to_string()));
        }
        if self.health_decay_per_turn < 0 {
            return Err(ConfigError::Invalid(
                "health_decay_per_turn must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
