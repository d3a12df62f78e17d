//! API key persistence.
//!
//! Items are keyed by the key digest; the plaintext never reaches storage.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use cred_core::Timestamp;
use cred_state::ApiKey;

use crate::error::StorageError;
use crate::kv::{KeyValueStore, Table};
use crate::record::{Attributes, StorageKey, StorageRecord};

#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn store(&self, api_key: &ApiKey) -> Result<(), StorageError>;

    /// Look up by digest. `Ok(None)` for unknown keys.
    async fn get(&self, key_digest: &str) -> Result<Option<ApiKey>, StorageError>;

    /// Set `last_used` to `at`.
    async fn touch(&self, key_digest: &str, at: Timestamp) -> Result<(), StorageError>;
}

#[derive(Clone)]
pub struct KvApiKeyRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvApiKeyRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ApiKeyRepository for KvApiKeyRepository {
    async fn store(&self, api_key: &ApiKey) -> Result<(), StorageError> {
        let Value::Object(attributes) = serde_json::to_value(api_key)
            .map_err(|e| StorageError::Serialization(e.to_string()))?
        else {
            return Err(StorageError::Serialization(
                "api key did not serialize to an object".into(),
            ));
        };
        let record = StorageRecord::new(StorageKey::api_key(&api_key.key_digest), attributes);
        self.store.put(Table::ApiKeys, record).await
    }

    async fn get(&self, key_digest: &str) -> Result<Option<ApiKey>, StorageError> {
        let Some(record) = self
            .store
            .get(Table::ApiKeys, &StorageKey::api_key(key_digest))
            .await?
        else {
            return Ok(None);
        };
        serde_json::from_value(Value::Object(record.attributes))
            .map(Some)
            .map_err(|e| StorageError::malformed("api_key", e.to_string()))
    }

    async fn touch(&self, key_digest: &str, at: Timestamp) -> Result<(), StorageError> {
        let mut attributes = Attributes::new();
        attributes.insert("last_used".into(), json!(at.to_iso8601()));
        self.store
            .update(Table::ApiKeys, &StorageKey::api_key(key_digest), attributes)
            .await
    }
}
