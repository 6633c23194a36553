//! Error type definitions.
//!
//! This module defines the resolution and coercion errors returned by every
//! store, the coarse [`ErrorKind`] taxonomy callers branch on, and the
//! initialization/database errors raised while wiring backends at start-up.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for the connection-pool registry.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// No pool has been registered under this logical name.
    #[error("Database [{0}] has not been initialized")]
    NotInitialized(String),

    /// The logical name is already bound to a pool for another URL.
    #[error("Database [{name}] is already initialized with a different URL")]
    AlreadyInitialized {
        /// Logical database name
        name: String,
    },

    /// SQL/connection error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Failures converting a resolved value into a typed result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    /// The value itself is absent/null.
    #[error("value is nil")]
    NilValue,

    /// The value's type has no conversion to the requested type.
    #[error("unsupported type {found} for conversion to {target}")]
    UnsupportedType {
        found: &'static str,
        target: &'static str,
    },

    /// Text could not be parsed as the requested type.
    #[error("cannot parse {input:?} as {target}")]
    ParseError { input: String, target: &'static str },

    /// Numeric value outside the range of the requested type.
    #[error("value {value} is out of range for {target}")]
    ValueOutOfRange { value: String, target: &'static str },
}

/// Errors returned by configuration stores and the resolver.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Key (or one of its parts) does not match the identifier grammar.
    #[error("invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// Key is absent from the store. Expected outcome, drives fallback.
    #[error("configuration item [{0}] not found")]
    NotFound(String),

    /// Key was found but its value cannot be converted to the requested type.
    #[error("configuration item [{key}] has an unusable value: {source}")]
    Coercion {
        key: String,
        #[source]
        source: CoercionError,
    },

    /// Transport error talking to the remote configuration service.
    #[error("remote store request failed: {0}")]
    Http(#[from] ReqwestError),

    /// Remote service answered with a non-success envelope.
    #[error("remote store rejected lookup (code {code}): {message}")]
    RemoteRejected { code: i64, message: String },

    /// Remote response body is not a valid envelope.
    #[error("remote store response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// Query against the relational store failed.
    #[error("relational store query failed: {0}")]
    Sql(#[from] sqlx::Error),

    /// Lookup exceeded the backend's intrinsic timeout.
    #[error("{backend} lookup timed out after {seconds}s")]
    Timeout { backend: &'static str, seconds: u64 },

    /// Caller cancelled the lookup.
    #[error("lookup cancelled")]
    Cancelled,

    /// A file referenced by the configuration could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid.
    #[error("failed to parse configuration document: {0}")]
    Document(#[from] serde_yaml::Error),

    /// An identity field is not acceptable for a lookup.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Bad connection descriptor or unsupported scheme.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection-pool registry failure.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ConfigError {
    /// Wraps a coercion failure for `key`.
    pub fn coercion(key: &str, source: CoercionError) -> Self {
        ConfigError::Coercion {
            key: key.trim().to_string(),
            source,
        }
    }

    /// Maps this error onto the coarse resolution taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::InvalidKeyFormat(_) => ErrorKind::InvalidKeyFormat,
            ConfigError::NotFound(_) => ErrorKind::NotFound,
            ConfigError::Coercion { source, .. } => match source {
                CoercionError::NilValue => ErrorKind::NilValue,
                CoercionError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
                CoercionError::ParseError { .. } => ErrorKind::ParseError,
                CoercionError::ValueOutOfRange { .. } => ErrorKind::ValueOutOfRange,
            },
            ConfigError::Http(_)
            | ConfigError::RemoteRejected { .. }
            | ConfigError::Decode(_)
            | ConfigError::Sql(_)
            | ConfigError::Timeout { .. }
            | ConfigError::Cancelled => ErrorKind::TransportFailure,
            ConfigError::Database(DatabaseError::SqlError(_))
            | ConfigError::Database(DatabaseError::NotInitialized(_)) => {
                ErrorKind::TransportFailure
            }
            ConfigError::Database(DatabaseError::AlreadyInitialized { .. })
            | ConfigError::Io { .. }
            | ConfigError::Document(_)
            | ConfigError::InvalidParameter(_)
            | ConfigError::Configuration(_) => ErrorKind::ConfigurationError,
        }
    }

    /// Returns `true` for the "key absent" sentinel.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound(_))
    }
}

/// Coarse classification of resolution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorKind {
    InvalidKeyFormat,
    NotFound,
    NilValue,
    UnsupportedType,
    ParseError,
    ValueOutOfRange,
    TransportFailure,
    ConfigurationError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidKeyFormat => "Invalid key format",
            ErrorKind::NotFound => "Not found",
            ErrorKind::NilValue => "Nil value",
            ErrorKind::UnsupportedType => "Unsupported type",
            ErrorKind::ParseError => "Parse error",
            ErrorKind::ValueOutOfRange => "Value out of range",
            ErrorKind::TransportFailure => "Transport failure",
            ErrorKind::ConfigurationError => "Configuration error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_all_error_kinds_have_string_representation() {
        for kind in ErrorKind::iter() {
            assert!(!kind.as_str().is_empty(), "{:?} should have non-empty string", kind);
        }
    }

    #[test]
    fn test_coercion_kinds() {
        let err = ConfigError::coercion(" port ", CoercionError::NilValue);
        assert_eq!(err.kind(), ErrorKind::NilValue);
        assert!(err.to_string().contains("[port]"));

        let err = ConfigError::coercion(
            "port",
            CoercionError::ParseError {
                input: "abc".into(),
                target: "int64",
            },
        );
        assert_eq!(err.kind(), ErrorKind::ParseError);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_transport_and_configuration_kinds() {
        assert_eq!(
            ConfigError::RemoteRejected {
                code: 500,
                message: "boom".into()
            }
            .kind(),
            ErrorKind::TransportFailure
        );
        assert_eq!(ConfigError::Cancelled.kind(), ErrorKind::TransportFailure);
        assert_eq!(
            ConfigError::Database(DatabaseError::AlreadyInitialized {
                name: "configdb".into()
            })
            .kind(),
            ErrorKind::ConfigurationError
        );
        assert_eq!(
            ConfigError::Configuration("three urls".into()).kind(),
            ErrorKind::ConfigurationError
        );
    }

    #[test]
    fn test_not_found_sentinel() {
        let err = ConfigError::NotFound("mail".into());
        assert!(err.is_not_found());
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "configuration item [mail] not found");
    }
}
