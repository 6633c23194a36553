//! Configuration key parsing and validation.
//!
//! A key is either `name` (implicit scope [`DEFAULT_SCOPE`]) or `scope.name`.
//! Both parts must match `^[A-Za-z0-9_-]+$`. Scope and name are later placed
//! into request URLs and SQL parameters, so every store parses the raw key
//! here before doing any I/O.
//!
//! Key functions:
//! - `ConfigKey::parse()` - Splits and validates a raw key
//! - `is_valid_name()` - Checks a single identifier against the grammar

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::DEFAULT_SCOPE;
use crate::error_handling::ConfigError;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").expect("identifier pattern is a valid regex")
});

/// Checks if the given string is a valid identifier (`[A-Za-z0-9_-]+`).
pub fn is_valid_name(s: &str) -> bool {
    NAME_PATTERN.is_match(s)
}

/// A parsed and validated configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigKey {
    scope: String,
    name: String,
}

impl ConfigKey {
    /// Parses a raw key into scope and name.
    ///
    /// Surrounding whitespace is trimmed. A key without a dot gets the
    /// default scope; a key with one dot is split into `scope.name`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKeyFormat` if the key has more than one
    /// dot or either part fails the identifier grammar.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let key = raw.trim();
        let parts: Vec<&str> = key.split('.').collect();
        let (scope, name) = match parts.as_slice() {
            [name] => (DEFAULT_SCOPE, *name),
            [scope, name] => (*scope, *name),
            _ => {
                return Err(ConfigError::InvalidKeyFormat(format!(
                    "{key:?}, expected format is 'scope.name' or 'name'"
                )))
            }
        };

        if !is_valid_name(scope) || !is_valid_name(name) {
            return Err(ConfigError::InvalidKeyFormat(format!(
                "{key:?}, scope and name may only contain letters, digits, '_' and '-'"
            )));
        }

        Ok(Self {
            scope: scope.to_string(),
            name: name.to_string(),
        })
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.scope, self.name)
    }
}
