//! Resolution facade.
//!
//! A [`Resolver`] is built once at start-up from a connection descriptor and
//! shared by reference. It offers:
//! - Optional getters (`get_string`, `get_int64`, ...) that return `None` for
//!   any failure and log why
//! - Defaulting getters (`get_int64_or`)
//! - Required getters (`must_get_string`, `must_get_int64`) that terminate
//!   the process when the value cannot be resolved
//!
//! Callers that need to tell failures apart use [`Resolver::store`] and the
//! `Result`-returning [`Store`] methods directly.

mod descriptor;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::config::{Identity, CONFIG_DB_NAME, CONFIG_MASK_DB_NAME};
use crate::error_handling::ConfigError;
use crate::store::{FileStore, OverrideStore, RelationalStore, RemoteStore, Store};
use crate::value::ConfigValue;

pub use descriptor::{parse_descriptor, BackendUrl, Descriptor};

/// Opens the store named by one descriptor entry.
///
/// A database backend registers its pool under `db_name`, so an origin and a
/// mask database never share a pool.
pub async fn open_store(
    backend: &BackendUrl,
    identity: &Identity,
    db_name: &str,
) -> Result<Arc<dyn Store>, ConfigError> {
    let store: Arc<dyn Store> = match backend {
        BackendUrl::File(path) => Arc::new(FileStore::load(path)?),
        BackendUrl::Remote(url) => Arc::new(RemoteStore::new(url, identity.clone())?),
        BackendUrl::Database(url) => {
            Arc::new(RelationalStore::connect_named(db_name, url, identity.clone()).await?)
        }
    };
    Ok(store)
}

/// Process-wide entry point for reading configuration.
pub struct Resolver {
    store: Arc<dyn Store>,
    cancel: CancellationToken,
}

impl Resolver {
    /// Builds the store stack named by `descriptor` (`origin[,mask]`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Configuration` for a malformed descriptor, or
    /// the backend's error if a store cannot be opened.
    pub async fn connect(descriptor: &str, identity: &Identity) -> Result<Self, ConfigError> {
        let Descriptor { origin, mask } = parse_descriptor(descriptor)?;

        let origin = open_store(&origin, identity, CONFIG_DB_NAME).await?;
        let store: Arc<dyn Store> = match mask {
            Some(mask) => {
                let mask = open_store(&mask, identity, CONFIG_MASK_DB_NAME).await?;
                Arc::new(OverrideStore::new(origin, Some(mask)))
            }
            None => origin,
        };

        info!("Resolving configuration from {}", store.describe());
        Ok(Self::from_store(store))
    }

    /// Wraps an already-built store.
    pub fn from_store(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            cancel: CancellationToken::new(),
        }
    }

    /// The underlying store, for callers that need the error detail.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Token cancelled by [`Resolver::shutdown`]; pass it to direct store calls.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Aborts lookups in flight. Later lookups fail with `Cancelled`.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub async fn get_value(&self, key: &str) -> Option<ConfigValue> {
        found(key, self.store.get_value(key, &self.cancel).await)
    }

    pub async fn get_string(&self, key: &str) -> Option<String> {
        found(key, self.store.get_string(key, &self.cancel).await)
    }

    pub async fn get_bool(&self, key: &str) -> Option<bool> {
        found(key, self.store.get_bool(key, &self.cancel).await)
    }

    pub async fn get_int64(&self, key: &str) -> Option<i64> {
        found(key, self.store.get_int64(key, &self.cancel).await)
    }

    pub async fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        found(key, self.store.get_timestamp(key, &self.cancel).await)
    }

    /// Resolves an integer, falling back to `default` on any failure.
    pub async fn get_int64_or(&self, key: &str, default: i64) -> i64 {
        self.get_int64(key).await.unwrap_or(default)
    }

    /// Resolves a required string. Terminates the process if unavailable.
    pub async fn must_get_string(&self, key: &str) -> String {
        match self.store.get_string(key, &self.cancel).await {
            Ok(value) => value,
            Err(e) => terminate(key, &e),
        }
    }

    /// Resolves a required integer. Terminates the process if unavailable.
    pub async fn must_get_int64(&self, key: &str) -> i64 {
        match self.store.get_int64(key, &self.cancel).await {
            Ok(value) => value,
            Err(e) => terminate(key, &e),
        }
    }
}

fn found<T>(key: &str, result: Result<T, ConfigError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_not_found() => {
            debug!("{e}");
            None
        }
        Err(e) => {
            warn!("Failed to resolve [{}] ({}): {}", key.trim(), e.kind(), e);
            None
        }
    }
}

fn terminate(key: &str, e: &ConfigError) -> ! {
    error!(
        "Required configuration item [{}] is unavailable: {}",
        key.trim(),
        e
    );
    std::process::exit(1)
}
