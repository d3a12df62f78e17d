//! Key-value storage backend trait.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::{Attributes, StorageKey, StorageRecord};

/// Logical table an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Credentials,
    ApiKeys,
}

impl Table {
    /// Physical table name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::ApiKeys => "api_keys",
        }
    }
}

/// Abstract key-value backend addressed by [`StorageKey`].
///
/// Every operation is atomic for a single item. Nothing spans items.
///
/// | Method | Semantics |
/// |--------|-----------|
/// | [`get`](KeyValueStore::get) | Whole item, or `None` |
/// | [`put`](KeyValueStore::put) | Replace the whole item |
/// | [`update`](KeyValueStore::update) | Overwrite the named attributes, keeping the rest; creates the item if absent |
/// | [`ping`](KeyValueStore::ping) | Round-trip to the backend |
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, table: Table, key: &StorageKey)
        -> Result<Option<StorageRecord>, StorageError>;

    async fn put(&self, table: Table, record: StorageRecord) -> Result<(), StorageError>;

    async fn update(
        &self,
        table: Table,
        key: &StorageKey,
        attributes: Attributes,
    ) -> Result<(), StorageError>;

    async fn ping(&self) -> Result<(), StorageError>;
}
