//! Layered store: a mask store over an origin store.
//!
//! The mask is always consulted first. A value from the mask wins and the
//! origin is never queried. A mask miss (not found, or a stored null) falls
//! through to the origin. Any other mask error fails the lookup: a broken
//! override layer must not silently expose origin values.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio_util::sync::CancellationToken;

use super::Store;
use crate::error_handling::ConfigError;
use crate::key::ConfigKey;
use crate::value::ConfigValue;

/// Composes an optional mask store over an origin store.
pub struct OverrideStore {
    origin: Arc<dyn Store>,
    mask: Option<Arc<dyn Store>>,
}

impl OverrideStore {
    pub fn new(origin: Arc<dyn Store>, mask: Option<Arc<dyn Store>>) -> Self {
        Self { origin, mask }
    }
}

#[async_trait]
impl Store for OverrideStore {
    async fn get_value(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<ConfigValue, ConfigError> {
        if let Some(mask) = &self.mask {
            match mask.get_value(key, cancel).await {
                Ok(value) if !value.is_null() => return Ok(value),
                Ok(_) => debug!("{} holds null for [{}], trying origin", mask.describe(), key),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        match self.origin.get_value(key, cancel).await? {
            ConfigValue::Null => {
                let key = ConfigKey::parse(key)
                    .map(|k| k.to_string())
                    .unwrap_or_else(|_| key.trim().to_string());
                Err(ConfigError::NotFound(key))
            }
            value => Ok(value),
        }
    }

    fn describe(&self) -> String {
        match &self.mask {
            Some(mask) => format!("{} over {}", mask.describe(), self.origin.describe()),
            None => self.origin.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorKind;
    use crate::store::test_helpers::StubStore;

    fn layered(origin: &Arc<StubStore>, mask: &Arc<StubStore>) -> OverrideStore {
        OverrideStore::new(origin.clone(), Some(mask.clone()))
    }

    #[tokio::test]
    async fn test_mask_wins_without_consulting_origin() {
        let origin = Arc::new(StubStore::new("origin").with_value("mail", "origin.example"));
        let mask = Arc::new(StubStore::new("mask").with_value("mail", "127.0.0.1"));
        let store = layered(&origin, &mask);

        let value = store
            .get_string("mail", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(value, "127.0.0.1");
        assert_eq!(mask.calls(), 1);
        assert_eq!(origin.calls(), 0);
    }

    #[tokio::test]
    async fn test_mask_miss_falls_back_to_origin() {
        let origin = Arc::new(StubStore::new("origin").with_value("mail", "origin.example"));
        let mask = Arc::new(StubStore::new("mask"));
        let store = layered(&origin, &mask);

        let value = store
            .get_string("mail", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(value, "origin.example");
        assert_eq!(mask.calls(), 1);
        assert_eq!(origin.calls(), 1);
    }

    #[tokio::test]
    async fn test_absent_everywhere_is_not_found() {
        let origin = Arc::new(StubStore::new("origin"));
        let mask = Arc::new(StubStore::new("mask"));
        let store = layered(&origin, &mask);

        let err = store
            .get_value("mail", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_mask_failure_is_hard_error() {
        let origin = Arc::new(StubStore::new("origin").with_value("mail", "origin.example"));
        let mask = Arc::new(StubStore::new("mask").with_failure("mail"));
        let store = layered(&origin, &mask);

        let err = store
            .get_value("mail", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert_eq!(origin.calls(), 0);
    }

    #[tokio::test]
    async fn test_origin_failure_propagates() {
        let origin = Arc::new(StubStore::new("origin").with_failure("mail"));
        let mask = Arc::new(StubStore::new("mask"));
        let store = layered(&origin, &mask);

        let err = store
            .get_value("mail", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
    }

    #[tokio::test]
    async fn test_null_in_mask_falls_through() {
        let origin = Arc::new(StubStore::new("origin").with_value("port", 8080_i64));
        let mask = Arc::new(StubStore::new("mask").with_value("port", ConfigValue::Null));
        let store = layered(&origin, &mask);

        let value = store
            .get_int64("port", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(value, 8080);
        assert_eq!(origin.calls(), 1);
    }

    #[tokio::test]
    async fn test_null_in_origin_is_not_found() {
        let origin = Arc::new(StubStore::new("origin").with_value("port", ConfigValue::Null));
        let store = OverrideStore::new(origin.clone(), None);

        let err = store
            .get_value("port", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "configuration item [svc.port] not found");
    }

    #[tokio::test]
    async fn test_coercion_failure_is_distinct_from_not_found() {
        let origin = Arc::new(StubStore::new("origin").with_value("port", "eighty"));
        let store = OverrideStore::new(origin.clone(), None);

        let err = store
            .get_int64("port", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_describe_lists_layers() {
        let origin = Arc::new(StubStore::new("origin"));
        let mask = Arc::new(StubStore::new("mask"));
        assert_eq!(layered(&origin, &mask).describe(), "mask over origin");
        assert_eq!(OverrideStore::new(origin, None).describe(), "origin");
    }
}
