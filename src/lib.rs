//! layered_config library: typed configuration resolution over layered stores
//!
//! This library resolves configuration values from a local YAML document
//! (overlaid with the process environment), a remote HTTP configuration
//! service, or a relational `configuration` table. Two stores can be layered
//! so that a local mask overrides a shared origin.
//!
//! # Example
//!
//! ```no_run
//! use layered_config::{Identity, Resolver};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = Identity::new("huable", "portal", "production", "api");
//! let resolver = Resolver::connect(
//!     "galaxy://config.internal:8080,file://./override.yaml",
//!     &identity,
//! )
//! .await?;
//!
//! let max_sessions = resolver.get_int64_or("app.max_sessions", 5).await;
//! let mail_host = resolver.must_get_string("mail").await;
//! println!("{mail_host} accepts {max_sessions} sessions");
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Remote and relational stores require a Tokio runtime.

pub mod cache;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod key;
pub mod resolver;
pub mod storage;
pub mod store;
pub mod value;

// Re-export public API
pub use config::{Identity, LogFormat, LogLevel, Opt, ValueType};
pub use error_handling::{CoercionError, ConfigError, ErrorKind};
pub use key::ConfigKey;
pub use resolver::Resolver;
pub use store::{FileStore, OverrideStore, RelationalStore, RemoteStore, Store};
pub use value::ConfigValue;

pub use tokio_util::sync::CancellationToken;
