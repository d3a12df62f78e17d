//! # cred-store: Storage Boundary
//!
//! Everything between the domain model and a key-value backend.
//!
//! ## Layers
//!
//! - **Records** (`record.rs`): [`StorageKey`] (partition + sort key) and
//!   [`StorageRecord`] (flat attribute map with typed accessors).
//! - **Mappers** (`mapper.rs`): domain ⇄ record conversion per credential
//!   type, dispatched by [`CredentialType`](cred_core::CredentialType).
//! - **Backends** (`kv.rs`, `memory.rs`, `postgres.rs`): the
//!   [`KeyValueStore`] trait with `get` / `put` / `update`, backed by an
//!   in-process map or by PostgreSQL JSONB rows.
//! - **Repositories** (`repository.rs`, `api_key_repository.rs`):
//!   credential and API key persistence over any [`KeyValueStore`].
//!
//! ## Key layout
//!
//! | Record     | Partition key                          | Sort key            |
//! |------------|----------------------------------------|---------------------|
//! | Credential | `CRED#{issuing_country}#{credential_id}` | `METADATA#{type}` |
//! | API key    | `APIKEY#{sha256 hex of key}`           | `METADATA`          |

pub mod api_key_repository;
pub mod error;
pub mod kv;
pub mod mapper;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod repository;

pub use api_key_repository::{ApiKeyRepository, KvApiKeyRepository};
pub use error::{RepositoryError, StorageError};
pub use kv::{KeyValueStore, Table};
pub use mapper::{CredentialMapper, DriversLicenseMapper, MapperProvider, PassportMapper};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use record::{Attributes, StorageKey, StorageRecord};
pub use repository::{CredentialRepository, KvCredentialRepository};
