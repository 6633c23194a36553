//! File/environment store.
//!
//! Loads a YAML document into memory, overlays every process environment
//! variable as a top-level key (environment wins), then resolves directives
//! in string values:
//! - `include://<path>` is replaced by the contents of that file
//! - `content://<text>` is replaced by `<text>` verbatim
//!
//! Lookups ignore the key's scope. A missing source file yields an empty
//! store so an optional local override file can be absent.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};
use tokio_util::sync::CancellationToken;

use super::Store;
use crate::config::{CONTENT_PREFIX, INCLUDE_PREFIX};
use crate::error_handling::ConfigError;
use crate::key::ConfigKey;
use crate::value::{yaml_key, ConfigValue};

/// In-memory store built from a document and the process environment.
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    values: HashMap<String, ConfigValue>,
    source: Option<PathBuf>,
}

impl FileStore {
    /// A store with no values.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the document at `path` and overlays the process environment.
    ///
    /// If `path` does not exist the store is empty (the environment is not
    /// overlaid either).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the document or an included file cannot
    /// be read, or `ConfigError::Document` if the document is not valid YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(
                "Configuration file {} does not exist, using an empty store",
                path.display()
            );
            return Ok(Self::empty());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut store = Self::parse(&content)?;
        store.source = Some(path.to_path_buf());
        info!(
            "Loaded {} configuration values from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parses document text and overlays the process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::parse_with_env(content, utf8_pairs(std::env::vars_os()))
    }

    /// Parses document text and overlays the given environment pairs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Document` if the text is not YAML or its top
    /// level is not a mapping, or `ConfigError::Io` if an `include://` file
    /// cannot be read.
    pub fn parse_with_env<I>(content: &str, env: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut values = parse_document(content)?;

        for (name, value) in env {
            values.insert(name, ConfigValue::String(value));
        }

        for value in values.values_mut() {
            resolve_directive(value)?;
        }

        Ok(Self {
            values,
            source: None,
        })
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up a name directly, without key parsing.
    pub fn lookup(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }
}

fn utf8_pairs<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
            (Ok(name), Ok(value)) => Some((name, value)),
            (name, _) => {
                debug!(
                    "Skipping environment variable {:?} with a non UTF-8 name or value",
                    name.unwrap_or_else(|n| n.to_string_lossy().into_owned())
                );
                None
            }
        })
}

fn parse_document(content: &str) -> Result<HashMap<String, ConfigValue>, ConfigError> {
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    match serde_yaml::from_str::<serde_yaml::Value>(content)? {
        serde_yaml::Value::Null => Ok(HashMap::new()),
        serde_yaml::Value::Mapping(mapping) => Ok(mapping
            .into_iter()
            .filter_map(|(k, v)| yaml_key(k).map(|k| (k, ConfigValue::from(v))))
            .collect()),
        other => {
            let found = ConfigValue::from(other).type_name();
            Err(ConfigError::Document(serde::de::Error::custom(format!(
                "top level of a configuration document must be a mapping, found {found}"
            ))))
        }
    }
}

fn resolve_directive(value: &mut ConfigValue) -> Result<(), ConfigError> {
    let ConfigValue::String(text) = value else {
        return Ok(());
    };

    if let Some(path) = text.strip_prefix(INCLUDE_PREFIX) {
        let path = PathBuf::from(path);
        let included = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        debug!("Included configuration value from {}", path.display());
        *text = included;
    } else if let Some(literal) = text.strip_prefix(CONTENT_PREFIX) {
        *text = literal.to_string();
    }
    Ok(())
}

#[async_trait]
impl Store for FileStore {
    async fn get_value(
        &self,
        key: &str,
        _cancel: &CancellationToken,
    ) -> Result<ConfigValue, ConfigError> {
        let key = ConfigKey::parse(key)?;
        self.values
            .get(key.name())
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))
    }

    fn describe(&self) -> String {
        match &self.source {
            Some(path) => format!("file store ({})", path.display()),
            None => "file store".to_string(),
        }
    }
}
