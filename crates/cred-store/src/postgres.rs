//! # PostgreSQL Backend
//!
//! Each logical [`Table`] is a physical table `(pk TEXT, sk TEXT, item JSONB)`
//! created by the embedded migrations. Writes are single-statement upserts;
//! a partial update merges the new attributes into `item` with `||`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;

use crate::error::StorageError;
use crate::kv::{KeyValueStore, Table};
use crate::record::{Attributes, StorageKey, StorageRecord};

/// Connect to `url` and apply embedded migrations.
pub async fn init_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// [`KeyValueStore`] over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for PgStore {
    async fn get(
        &self,
        table: Table,
        key: &StorageKey,
    ) -> Result<Option<StorageRecord>, StorageError> {
        let sql = format!("SELECT item FROM {} WHERE pk = $1 AND sk = $2", table.name());
        let row: Option<(Json<Value>,)> = sqlx::query_as(&sql)
            .bind(&key.partition_key)
            .bind(&key.sort_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            None => Ok(None),
            Some((Json(Value::Object(attributes)),)) => {
                Ok(Some(StorageRecord::new(key.clone(), attributes)))
            }
            Some(_) => Err(StorageError::malformed("item", "stored item is not an object")),
        }
    }

    async fn put(&self, table: Table, record: StorageRecord) -> Result<(), StorageError> {
        let sql = format!(
            "INSERT INTO {t} (pk, sk, item) VALUES ($1, $2, $3) \
             ON CONFLICT (pk, sk) DO UPDATE SET item = EXCLUDED.item",
            t = table.name()
        );
        sqlx::query(&sql)
            .bind(&record.key.partition_key)
            .bind(&record.key.sort_key)
            .bind(Json(Value::Object(record.attributes)))
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn update(
        &self,
        table: Table,
        key: &StorageKey,
        attributes: Attributes,
    ) -> Result<(), StorageError> {
        let sql = format!(
            "INSERT INTO {t} (pk, sk, item) VALUES ($1, $2, $3) \
             ON CONFLICT (pk, sk) DO UPDATE SET item = {t}.item || EXCLUDED.item",
            t = table.name()
        );
        sqlx::query(&sql)
            .bind(&key.partition_key)
            .bind(&key.sort_key)
            .bind(Json(Value::Object(attributes)))
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}

fn storage_error(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => {
            tracing::error!(error = %e, "PostgreSQL connection failure");
            StorageError::Connection(e.to_string())
        }
        other => {
            tracing::error!(error = %other, "PostgreSQL operation failed");
            StorageError::Operation(other.to_string())
        }
    }
}
