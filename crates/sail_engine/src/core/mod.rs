//! # Core Engine Module
//!
//! Shared abstractions used by the rest of the engine.
//!
//! ## Organization
//!
//! - **Config**: Engine configuration (simulation timing, logging)

pub mod config;

// Re-export commonly used config types
pub use config::{
    EngineConfig,
    SimulationConfig,
    LoggingConfig,
    Config,
    ConfigError,
};
