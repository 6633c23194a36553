//! HTTP client initialization.
//!
//! This module provides the HTTP client used by the remote store to talk to
//! the configuration service.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::REMOTE_TIMEOUT_SECS;
use crate::error_handling::InitializationError;

/// Initializes the HTTP client for the remote configuration service.
///
/// Creates a `reqwest::Client` configured with:
/// - A total request timeout of `timeout_seconds`
/// - A connect timeout capped at the same value
/// - A `layered_config/<version>` User-Agent
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(timeout_seconds: u64) -> Result<reqwest::Client, InitializationError> {
    let timeout = Duration::from_secs(timeout_seconds);
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("layered_config/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Initializes the HTTP client with the default remote timeout (10s).
pub fn init_default_client() -> Result<reqwest::Client, InitializationError> {
    init_client(REMOTE_TIMEOUT_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_builds() {
        assert!(init_client(1).is_ok());
        assert!(init_default_client().is_ok());
    }
}
