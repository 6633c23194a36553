//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (cache lifetimes, timeouts, markers, etc.)
//! - The identity tuple addressing remote and relational lookups
//! - CLI option types and parsing
//! - Run-mode detection (debug / environment name)

mod constants;
mod environment;
mod types;

// Re-export all constants
pub use constants::*;
pub use environment::{debug_mode, env_name};
pub use types::{Identity, LogFormat, LogLevel, Opt, ValueType};
