//! In-memory [`KeyValueStore`] for development and tests.
//!
//! Items live in a `HashMap` per table behind a [`parking_lot::RwLock`].
//! Nothing is persisted across restarts.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::StorageError;
use crate::kv::{KeyValueStore, Table};
use crate::record::{Attributes, StorageKey, StorageRecord};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<(Table, StorageKey), Attributes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items in `table`.
    pub fn len(&self, table: Table) -> usize {
        self.tables.read().keys().filter(|(t, _)| *t == table).count()
    }

    pub fn is_empty(&self, table: Table) -> bool {
        self.len(table) == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(
        &self,
        table: Table,
        key: &StorageKey,
    ) -> Result<Option<StorageRecord>, StorageError> {
        Ok(self
            .tables
            .read()
            .get(&(table, key.clone()))
            .map(|attributes| StorageRecord::new(key.clone(), attributes.clone())))
    }

    async fn put(&self, table: Table, record: StorageRecord) -> Result<(), StorageError> {
        self.tables
            .write()
            .insert((table, record.key), record.attributes);
        Ok(())
    }

    async fn update(
        &self,
        table: Table,
        key: &StorageKey,
        attributes: Attributes,
    ) -> Result<(), StorageError> {
        let mut tables = self.tables.write();
        let item = tables.entry((table, key.clone())).or_default();
        item.extend(attributes);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
