//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - HTTP client for the remote store (with timeouts)
//! - Logger (plain or JSON)
//!
//! Database pools are initialized by the relational store through
//! [`crate::storage`]. All initialization functions return proper error
//! types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::{init_client, init_default_client};
pub use logger::init_logger_with;
