//! Relational database store.
//!
//! Resolves keys against the `configuration` table:
//!
//! ```sql
//! SELECT content FROM [schema.]configuration
//! WHERE environment = $1 AND name = $2 LIMIT 1
//! ```
//!
//! Every identity field and both key parts are checked against the
//! identifier grammar, and the project against an allow-list, before any SQL
//! is issued. A missing row and a NULL `content` both resolve to not found.

use std::collections::HashSet;

use async_trait::async_trait;
use log::debug;
use sqlx::AnyPool;
use tokio_util::sync::CancellationToken;
use url::form_urlencoded;

use super::Store;
use crate::cache::TtlCache;
use crate::config::{
    Identity, CONFIG_DB_NAME, CONFIG_TABLE, DEFAULT_ALLOWED_PROJECTS, QUERY_TIMEOUT, SCHEMA_PARAM,
};
use crate::error_handling::ConfigError;
use crate::key::{is_valid_name, ConfigKey};
use crate::storage::init_pool_for;
use crate::value::ConfigValue;

/// Store backed by a pooled relational connection.
pub struct RelationalStore {
    db_name: String,
    pool: AnyPool,
    identity: Identity,
    allowed_projects: HashSet<String>,
    sql: String,
    cache: TtlCache<ConfigValue>,
}

/// Splits the optional `schema` query parameter off a connection URL.
///
/// Returns the URL to hand to the driver and the schema, if any.
fn split_schema(url: &str) -> Result<(String, Option<String>), ConfigError> {
    let Some((base, query)) = url.split_once('?') else {
        return Ok((url.to_string(), None));
    };

    let mut schema = None;
    let mut rest = form_urlencoded::Serializer::new(String::new());
    for (k, v) in form_urlencoded::parse(query.as_bytes()) {
        if k == SCHEMA_PARAM {
            schema = Some(v.into_owned());
        } else {
            rest.append_pair(&k, &v);
        }
    }

    if let Some(schema) = &schema {
        if !is_valid_name(schema) {
            return Err(ConfigError::Configuration(format!(
                "invalid schema name {schema:?} in database URL"
            )));
        }
    }

    let rest = rest.finish();
    let url = if rest.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{rest}")
    };
    Ok((url, schema))
}

fn lookup_sql(schema: Option<&str>) -> String {
    let table = match schema {
        Some(schema) => format!("{schema}.{CONFIG_TABLE}"),
        None => CONFIG_TABLE.to_string(),
    };
    format!("SELECT content FROM {table} WHERE environment = $1 AND name = $2 LIMIT 1")
}

impl RelationalStore {
    /// Connects (or reuses the pool registered) under the default logical
    /// database name.
    pub async fn connect(url: &str, identity: Identity) -> Result<Self, ConfigError> {
        Self::connect_named(CONFIG_DB_NAME, url, identity).await
    }

    /// Connects under a caller-chosen logical database name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Configuration` for a bad schema parameter, or
    /// `ConfigError::Database` if the pool cannot be created or `db_name` is
    /// already bound to another URL.
    pub async fn connect_named(
        db_name: &str,
        url: &str,
        identity: Identity,
    ) -> Result<Self, ConfigError> {
        let (url, schema) = split_schema(url)?;
        let pool = init_pool_for(db_name, &url).await?;

        Ok(Self {
            db_name: db_name.to_string(),
            pool,
            identity,
            allowed_projects: DEFAULT_ALLOWED_PROJECTS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            sql: lookup_sql(schema.as_deref()),
            cache: TtlCache::new(),
        })
    }

    /// Replaces the set of projects this store resolves values for.
    pub fn with_allowed_projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_projects = projects.into_iter().map(Into::into).collect();
        self
    }

    /// The lookup statement issued for every cache miss.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of live entries in the value cache.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    fn validate(&self, key: &ConfigKey) -> Result<(), ConfigError> {
        let fields = self
            .identity
            .fields()
            .into_iter()
            .chain([("scope", key.scope()), ("name", key.name())]);
        for (field, value) in fields {
            if !is_valid_name(value) {
                return Err(ConfigError::InvalidParameter(format!(
                    "{field} {value:?} is not a valid identifier"
                )));
            }
        }

        if !self.allowed_projects.contains(&self.identity.project) {
            return Err(ConfigError::InvalidParameter(format!(
                "project {:?} is not served by this store",
                self.identity.project
            )));
        }
        Ok(())
    }

    async fn query(&self, key: &ConfigKey) -> Result<ConfigValue, ConfigError> {
        let lookup = sqlx::query_scalar::<_, Option<String>>(&self.sql)
            .bind(self.identity.env.as_str())
            .bind(key.name())
            .fetch_optional(&self.pool);

        let row = tokio::time::timeout(QUERY_TIMEOUT, lookup)
            .await
            .map_err(|_| ConfigError::Timeout {
                backend: "relational store",
                seconds: QUERY_TIMEOUT.as_secs(),
            })??;

        match row.flatten() {
            Some(content) => Ok(ConfigValue::String(content)),
            None => Err(ConfigError::NotFound(key.to_string())),
        }
    }
}

#[async_trait]
impl Store for RelationalStore {
    async fn get_value(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<ConfigValue, ConfigError> {
        let key = ConfigKey::parse(key)?;
        self.validate(&key)?;

        let cache_key = format!("{}|{}|{}", self.sql, self.identity.env, key.name());
        if let Some(value) = self.cache.get(&cache_key) {
            return Ok(value);
        }

        debug!("Querying [{}] for {}", self.db_name, key);
        let value = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ConfigError::Cancelled),
            result = self.query(&key) => result?,
        };

        self.cache.set(cache_key, value.clone());
        Ok(value)
    }

    fn describe(&self) -> String {
        format!("relational store ({})", self.db_name)
    }
}
