//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Frame timing for the external loop driver
//! - Logging utilities

pub mod time;
pub mod logging;
