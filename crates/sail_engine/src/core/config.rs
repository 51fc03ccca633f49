//! # Engine Configuration
//!
//! Configuration structures for the simulation core. Files are optional:
//! every structure has usable defaults and can be loaded from TOML or RON
//! through the [`Config`] trait.

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// # Simulation Configuration
///
/// Timing parameters for the per-tick driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed timestep used by headless drivers (seconds)
    pub fixed_timestep: f32,
    /// Upper bound for a single frame delta (seconds); protects against
    /// huge steps after the process was suspended
    pub max_delta: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_delta: 0.25,
        }
    }
}

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `env_logger` filter when `RUST_LOG` is not set
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// # Engine Configuration
///
/// Top-level configuration handed to [`crate::Engine::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulation timing
    pub simulation: SimulationConfig,
    /// Logger setup
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.simulation.fixed_timestep > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "simulation.fixed_timestep must be positive, got {}",
                self.simulation.fixed_timestep
            )));
        }
        if self.simulation.max_delta < self.simulation.fixed_timestep {
            return Err(ConfigError::Invalid(format!(
                "simulation.max_delta ({}) is smaller than fixed_timestep ({})",
                self.simulation.max_delta, self.simulation.fixed_timestep
            )));
        }
        Ok(())
    }
}

impl Config for EngineConfig {}
