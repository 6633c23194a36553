//! Configuration constants.
//!
//! This module defines the constants shared by the stores and the resolver,
//! including cache lifetimes, network/query timeouts, document markers and
//! connection-pool sizing.

use std::time::Duration;

/// Scope used when a key is given without a `scope.` prefix.
pub const DEFAULT_SCOPE: &str = "svc";

// Cache lifetimes (remote and relational stores)
/// Time-to-live of a resolved value in a store cache
pub const CACHE_TTL: Duration = Duration::from_secs(30);
/// Minimum interval between two sweeps of expired cache entries
pub const CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

// Network operation timeouts
/// HTTP client timeout for the remote configuration service, in seconds
pub const REMOTE_TIMEOUT_SECS: u64 = 10;
/// Upper bound for a single relational lookup (pool acquire + query)
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

// File store directives
/// A string value with this prefix is replaced by the contents of the named file.
pub const INCLUDE_PREFIX: &str = "include://";
/// A string value with this prefix is used verbatim, minus the prefix.
pub const CONTENT_PREFIX: &str = "content://";

// Connection descriptor schemes
/// Scheme of the remote configuration service. Rewritten to `http://` before use.
pub const REMOTE_SCHEME: &str = "galaxy://";
/// Scheme of a local document.
pub const FILE_SCHEME: &str = "file:";
/// Schemes handed to the relational store as raw connection strings.
pub const DATABASE_SCHEMES: &[&str] = &["postgres://", "postgresql://", "sqlite:"];
/// Maximum number of backends in a connection descriptor (origin + mask).
pub const MAX_DESCRIPTOR_ENTRIES: usize = 2;

/// Envelope code signalling success from the remote configuration service.
pub const REMOTE_CODE_OK: i64 = 200;

// Relational store
/// Logical name under which the configuration database pool is registered.
pub const CONFIG_DB_NAME: &str = "configdb";
/// Logical name of the pool used when the mask entry of a descriptor is a database.
pub const CONFIG_MASK_DB_NAME: &str = "configdb_mask";
/// Table holding configuration rows.
pub const CONFIG_TABLE: &str = "configuration";
/// URL query parameter naming the schema that holds [`CONFIG_TABLE`].
/// Stripped from the URL before connecting.
pub const SCHEMA_PARAM: &str = "schema";
/// Tenants the relational store is allowed to resolve values for.
pub const DEFAULT_ALLOWED_PROJECTS: &[&str] = &["huable", "weable", "calieo"];

// Connection pool sizing
pub const POOL_MAX_CONNECTIONS: u32 = 10;
pub const POOL_MIN_CONNECTIONS: u32 = 0;
pub const POOL_MAX_LIFETIME: Duration = Duration::from_secs(5 * 60);
