//! Connection descriptor parsing.
//!
//! A descriptor names one or two backends separated by a comma:
//! `origin[,mask]`. The scheme of each entry selects the backend.

use std::path::PathBuf;

use crate::config::{DATABASE_SCHEMES, FILE_SCHEME, MAX_DESCRIPTOR_ENTRIES, REMOTE_SCHEME};
use crate::error_handling::ConfigError;

/// One backend named by a descriptor entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendUrl {
    /// Local YAML document.
    File(PathBuf),
    /// Remote configuration service, already rewritten to `http://`.
    Remote(String),
    /// Raw database connection string.
    Database(String),
}

impl BackendUrl {
    /// Parses a single descriptor entry.
    ///
    /// Entries without a scheme are local file paths.
    pub fn parse(entry: &str) -> Result<Self, ConfigError> {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(ConfigError::Configuration(
                "empty entry in connection descriptor".to_string(),
            ));
        }

        if let Some(rest) = entry.strip_prefix(REMOTE_SCHEME) {
            return Ok(BackendUrl::Remote(format!("http://{rest}")));
        }
        if DATABASE_SCHEMES.iter().any(|scheme| entry.starts_with(scheme)) {
            return Ok(BackendUrl::Database(entry.to_string()));
        }
        if let Some(rest) = entry.strip_prefix(FILE_SCHEME) {
            let path = rest.strip_prefix("//").unwrap_or(rest);
            return Ok(BackendUrl::File(PathBuf::from(path)));
        }
        if let Some((scheme, _)) = entry.split_once("://") {
            return Err(ConfigError::Configuration(format!(
                "unsupported scheme {scheme:?} in connection descriptor"
            )));
        }
        Ok(BackendUrl::File(PathBuf::from(entry)))
    }
}

/// Parsed descriptor: an origin store and an optional mask layered over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub origin: BackendUrl,
    pub mask: Option<BackendUrl>,
}

/// Parses `origin[,mask]`.
///
/// # Errors
///
/// Returns `ConfigError::Configuration` for an empty descriptor, more than
/// two entries, or an unsupported scheme.
pub fn parse_descriptor(descriptor: &str) -> Result<Descriptor, ConfigError> {
    let entries: Vec<&str> = descriptor.split(',').collect();
    if entries.len() > MAX_DESCRIPTOR_ENTRIES {
        return Err(ConfigError::Configuration(format!(
            "connection descriptor names {} backends, at most {} are supported",
            entries.len(),
            MAX_DESCRIPTOR_ENTRIES
        )));
    }

    match entries.as_slice() {
        [origin] => Ok(Descriptor {
            origin: BackendUrl::parse(origin)?,
            mask: None,
        }),
        [origin, mask] => Ok(Descriptor {
            origin: BackendUrl::parse(origin)?,
            mask: Some(BackendUrl::parse(mask)?),
        }),
        _ => Err(ConfigError::Configuration(
            "empty connection descriptor".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_schemes() {
        assert_eq!(
            BackendUrl::parse("file://./config.yaml").unwrap(),
            BackendUrl::File(PathBuf::from("./config.yaml"))
        );
        assert_eq!(
            BackendUrl::parse("file:///etc/app/config.yaml").unwrap(),
            BackendUrl::File(PathBuf::from("/etc/app/config.yaml"))
        );
        assert_eq!(
            BackendUrl::parse("file:config.yaml").unwrap(),
            BackendUrl::File(PathBuf::from("config.yaml"))
        );
        assert_eq!(
            BackendUrl::parse("override.yaml").unwrap(),
            BackendUrl::File(PathBuf::from("override.yaml"))
        );
        assert_eq!(
            BackendUrl::parse("galaxy://config.internal:8080").unwrap(),
            BackendUrl::Remote("http://config.internal:8080".to_string())
        );
        assert_eq!(
            BackendUrl::parse(" postgres://u:p@db:5432/cfg?schema=galaxy ").unwrap(),
            BackendUrl::Database("postgres://u:p@db:5432/cfg?schema=galaxy".to_string())
        );
        assert_eq!(
            BackendUrl::parse("sqlite://cfg.db").unwrap(),
            BackendUrl::Database("sqlite://cfg.db".to_string())
        );
    }

    #[test]
    fn test_unsupported_scheme() {
        let err = BackendUrl::parse("redis://cache:6379").unwrap_err();
        assert!(matches!(err, ConfigError::Configuration(_)));
    }

    #[test]
    fn test_single_entry() {
        let descriptor = parse_descriptor("file://./config.yaml").unwrap();
        assert_eq!(
            descriptor.origin,
            BackendUrl::File(PathBuf::from("./config.yaml"))
        );
        assert_eq!(descriptor.mask, None);
    }

    #[test]
    fn test_second_entry_is_mask() {
        let descriptor =
            parse_descriptor("galaxy://config.internal,file://./override.yaml").unwrap();
        assert_eq!(
            descriptor.origin,
            BackendUrl::Remote("http://config.internal".to_string())
        );
        assert_eq!(
            descriptor.mask,
            Some(BackendUrl::File(PathBuf::from("./override.yaml")))
        );
    }

    #[test]
    fn test_too_many_entries() {
        let err = parse_descriptor("a.yaml,b.yaml,c.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Configuration(_)));
    }

    #[test]
    fn test_empty_entries() {
        assert!(parse_descriptor("").is_err());
        assert!(parse_descriptor("file://a.yaml,").is_err());
    }
}
