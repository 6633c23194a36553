//! Error handling.
//!
//! This module provides:
//! - Resolution errors returned by every store (`ConfigError`)
//! - Coercion errors for typed getters (`CoercionError`)
//! - The coarse taxonomy callers branch on (`ErrorKind`)
//! - Start-up errors (`InitializationError`, `DatabaseError`)
//!
//! `NotFound` is an expected outcome used for fallback between layered
//! stores; it is never logged above `debug`. Every other kind is a hard
//! failure surfaced to the caller without retry.

mod types;

// Re-export public API
pub use types::{
    CoercionError, ConfigError, DatabaseError, ErrorKind, InitializationError,
};
