//! Configuration stores.
//!
//! Every backend implements [`Store`]: one raw lookup (`get_value`) plus
//! typed getters that call it exactly once and coerce the result. Backends:
//! - [`FileStore`] - YAML document overlaid with the process environment
//! - [`RemoteStore`] - HTTP configuration service with a TTL cache
//! - [`RelationalStore`] - `configuration` table behind a pooled connection
//! - [`OverrideStore`] - a mask store layered over an origin store
//!
//! Stores are created once at start-up and shared (`Arc<dyn Store>`) by any
//! number of concurrent callers.

mod file;
mod overlay;
mod relational;
mod remote;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::error_handling::ConfigError;
use crate::value::{coerce_bool, coerce_int64, coerce_string, coerce_timestamp, ConfigValue};

pub use file::FileStore;
pub use overlay::OverrideStore;
pub use relational::RelationalStore;
pub use remote::RemoteStore;

/// Read access to typed configuration values.
///
/// `get_value` returns `Err(ConfigError::NotFound)` when the key is absent.
/// A stored null is returned as `Ok(ConfigValue::Null)`; the typed getters
/// report it as a `NilValue` coercion error.
///
/// `cancel` aborts a network or database round trip in flight; stores that
/// never block ignore it.
#[async_trait]
pub trait Store: Send + Sync {
    /// Resolves the raw value stored under `key` (`name` or `scope.name`).
    async fn get_value(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<ConfigValue, ConfigError>;

    /// Short label for diagnostics.
    fn describe(&self) -> String;

    async fn get_string(&self, key: &str, cancel: &CancellationToken) -> Result<String, ConfigError> {
        let value = self.get_value(key, cancel).await?;
        coerce_string(&value).map_err(|e| ConfigError::coercion(key, e))
    }

    async fn get_bool(&self, key: &str, cancel: &CancellationToken) -> Result<bool, ConfigError> {
        let value = self.get_value(key, cancel).await?;
        coerce_bool(&value).map_err(|e| ConfigError::coercion(key, e))
    }

    async fn get_int64(&self, key: &str, cancel: &CancellationToken) -> Result<i64, ConfigError> {
        let value = self.get_value(key, cancel).await?;
        coerce_int64(&value).map_err(|e| ConfigError::coercion(key, e))
    }

    async fn get_timestamp(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<DateTime<Utc>, ConfigError> {
        let value = self.get_value(key, cancel).await?;
        coerce_timestamp(&value).map_err(|e| ConfigError::coercion(key, e))
    }
}
