//! Remote configuration service store.
//!
//! Resolves `(project, app, env, svc, scope, name)` against an HTTP service:
//!
//! ```text
//! GET {base}/config?project=..&app=..&env=..&svc=..&scope=..&name=..
//! {"code": 200, "message": "ok", "data": {"value": "..."}}
//! ```
//!
//! Resolved values are cached under the full request URL. Absent keys are
//! never cached, so a repeated lookup of a missing key always hits the
//! service.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::Store;
use crate::cache::TtlCache;
use crate::config::{Identity, REMOTE_CODE_OK};
use crate::error_handling::ConfigError;
use crate::initialization::init_default_client;
use crate::key::ConfigKey;
use crate::value::ConfigValue;

/// Response envelope of the configuration service.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<EnvelopeData>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
    #[serde(default)]
    value: Option<serde_json::Value>,
}

/// Store backed by the remote configuration service.
pub struct RemoteStore {
    base_url: Url,
    identity: Identity,
    client: reqwest::Client,
    cache: TtlCache<ConfigValue>,
}

impl RemoteStore {
    /// Creates a store for the service at `base_url` (an `http://` or
    /// `https://` URL) with a client bounded by the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Configuration` if the URL is invalid or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, identity: Identity) -> Result<Self, ConfigError> {
        let client =
            init_default_client().map_err(|e| ConfigError::Configuration(e.to_string()))?;
        Self::with_client(base_url, identity, client)
    }

    /// Creates a store using a caller-supplied HTTP client.
    pub fn with_client(
        base_url: &str,
        identity: Identity,
        client: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ConfigError::Configuration(format!("invalid remote store URL {base_url:?}: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Configuration(format!(
                "remote store URL {base_url} cannot be used as a base"
            )));
        }

        Ok(Self {
            base_url,
            identity,
            client,
            cache: TtlCache::new(),
        })
    }

    /// Renders the lookup URL for `key`.
    pub fn request_url(&self, key: &ConfigKey) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("config");
        }
        url.query_pairs_mut()
            .extend_pairs(self.identity.fields())
            .append_pair("scope", key.scope())
            .append_pair("name", key.name());
        url
    }

    /// Number of live entries in the value cache.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    async fn fetch(&self, url: &Url, key: &ConfigKey) -> Result<ConfigValue, ConfigError> {
        debug!("Fetching {} from {}", key, url);
        let response = self.client.get(url.clone()).send().await?;
        let body = response.bytes().await?;
        let envelope: Envelope = serde_json::from_slice(&body)?;

        if envelope.code != REMOTE_CODE_OK {
            return Err(ConfigError::RemoteRejected {
                code: envelope.code,
                message: envelope.message,
            });
        }
        let Some(data) = envelope.data else {
            return Err(ConfigError::RemoteRejected {
                code: envelope.code,
                message: format!("response for [{key}] carries no data"),
            });
        };

        match data.value {
            None | Some(serde_json::Value::Null) => Err(ConfigError::NotFound(key.to_string())),
            Some(serde_json::Value::String(s)) if s.is_empty() => {
                Err(ConfigError::NotFound(key.to_string()))
            }
            Some(value) => Ok(ConfigValue::from(value)),
        }
    }
}

#[async_trait]
impl Store for RemoteStore {
    async fn get_value(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<ConfigValue, ConfigError> {
        let key = ConfigKey::parse(key)?;
        let url = self.request_url(&key);

        if let Some(value) = self.cache.get(url.as_str()) {
            return Ok(value);
        }

        let value = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ConfigError::Cancelled),
            result = self.fetch(&url, &key) => result?,
        };

        self.cache.set(url.as_str(), value.clone());
        Ok(value)
    }

    fn describe(&self) -> String {
        format!("remote store ({})", self.base_url)
    }
}
