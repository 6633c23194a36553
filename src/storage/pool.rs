//! Database connection pool registry.
//!
//! Pools are registered under a logical database name and live for the rest
//! of the process. This module provides:
//! - Idempotent initialization per logical name (`init_pool_for`)
//! - Lookup of an initialized pool (`pool_for`)
//!
//! Re-initializing a name with the same URL returns the existing pool;
//! re-initializing it with a different URL is rejected.

use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock};

use log::{error, info};
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::config::{QUERY_TIMEOUT, POOL_MAX_CONNECTIONS, POOL_MAX_LIFETIME, POOL_MIN_CONNECTIONS};
use crate::error_handling::DatabaseError;

struct RegisteredPool {
    url: String,
    pool: AnyPool,
}

static POOLS: LazyLock<RwLock<HashMap<String, RegisteredPool>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

fn registered(name: &str, url: &str) -> Result<Option<AnyPool>, DatabaseError> {
    let pools = POOLS.read().unwrap_or_else(PoisonError::into_inner);
    match pools.get(name) {
        Some(existing) if existing.url == url => Ok(Some(existing.pool.clone())),
        Some(_) => Err(DatabaseError::AlreadyInitialized {
            name: name.to_string(),
        }),
        None => Ok(None),
    }
}

/// Initializes (or reuses) the connection pool registered under `name`.
///
/// The URL is a raw connection string handled by sqlx's `Any` driver
/// (`postgres://...`, `sqlite://...`).
///
/// # Errors
///
/// Returns `DatabaseError::AlreadyInitialized` if `name` is bound to another
/// URL, or `DatabaseError::SqlError` if the connection cannot be established.
pub async fn init_pool_for(name: &str, url: &str) -> Result<AnyPool, DatabaseError> {
    if let Some(pool) = registered(name, url)? {
        return Ok(pool);
    }

    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(POOL_MAX_CONNECTIONS)
        .min_connections(POOL_MIN_CONNECTIONS)
        .max_lifetime(POOL_MAX_LIFETIME)
        .acquire_timeout(QUERY_TIMEOUT)
        .connect(url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database [{name}]: {e}");
            DatabaseError::SqlError(e)
        })?;

    let mut pools = POOLS.write().unwrap_or_else(PoisonError::into_inner);
    // Another task may have registered the name while we were connecting
    match pools.get(name) {
        Some(existing) if existing.url == url => Ok(existing.pool.clone()),
        Some(_) => Err(DatabaseError::AlreadyInitialized {
            name: name.to_string(),
        }),
        None => {
            pools.insert(
                name.to_string(),
                RegisteredPool {
                    url: url.to_string(),
                    pool: pool.clone(),
                },
            );
            info!("Database [{name}] connected");
            Ok(pool)
        }
    }
}

/// Returns the pool registered under `name`.
///
/// # Errors
///
/// Returns `DatabaseError::NotInitialized` if `init_pool_for` has not
/// succeeded for `name`.
pub fn pool_for(name: &str) -> Result<AnyPool, DatabaseError> {
    POOLS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .map(|registered| registered.pool.clone())
        .ok_or_else(|| DatabaseError::NotInitialized(name.to_string()))
}
