//! # Credential Repository
//!
//! Persists credentials through a [`KeyValueStore`], addressed by the
//! composite key `(issuing_country, credential_id, credential_type)`.
//!
//! A lookup miss is [`RepositoryError::CredentialNotFound`], never a storage
//! error. `create` overwrites any existing item under the same key, and
//! concurrent `update_status` calls on one credential are last-write-wins.

use std::sync::Arc;

use async_trait::async_trait;

use cred_core::{CredentialId, CredentialType, IssuingCountry, Timestamp};
use cred_state::Credential;

use crate::error::RepositoryError;
use crate::kv::{KeyValueStore, Table};
use crate::mapper::{status_attributes, MapperProvider};
use crate::record::StorageKey;

#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn get(
        &self,
        credential_id: &CredentialId,
        credential_type: CredentialType,
        issuing_country: &IssuingCountry,
    ) -> Result<Credential, RepositoryError>;

    async fn create(&self, credential: &Credential) -> Result<(), RepositoryError>;

    /// Write `status`, both reasons and `updated_at` only. The credential
    /// must already have gone through its state machine.
    async fn update_status(&self, credential: &Credential) -> Result<(), RepositoryError>;
}

/// [`CredentialRepository`] over any key-value backend.
#[derive(Clone)]
pub struct KvCredentialRepository {
    store: Arc<dyn KeyValueStore>,
    mappers: MapperProvider,
}

impl KvCredentialRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            mappers: MapperProvider,
        }
    }
}

#[async_trait]
impl CredentialRepository for KvCredentialRepository {
    async fn get(
        &self,
        credential_id: &CredentialId,
        credential_type: CredentialType,
        issuing_country: &IssuingCountry,
    ) -> Result<Credential, RepositoryError> {
        let key = StorageKey::credential(issuing_country, credential_id, credential_type);
        let record = self
            .store
            .get(Table::Credentials, &key)
            .await?
            .ok_or_else(|| RepositoryError::CredentialNotFound {
                credential_id: credential_id.clone(),
                credential_type,
            })?;
        let mapper = self.mappers.mapper_for(credential_type);
        Ok(mapper.to_domain(&record)?)
    }

    async fn create(&self, credential: &Credential) -> Result<(), RepositoryError> {
        let mapper = self.mappers.mapper_for(credential.credential_type());
        let record = mapper.to_storage(credential, Timestamp::now())?;
        tracing::debug!(key = %record.key, "storing credential");
        self.store.put(Table::Credentials, record).await?;
        Ok(())
    }

    async fn update_status(&self, credential: &Credential) -> Result<(), RepositoryError> {
        let key = StorageKey::credential(
            credential.issuing_country(),
            credential.credential_id(),
            credential.credential_type(),
        );
        let attributes = status_attributes(credential, Timestamp::now());
        self.store
            .update(Table::Credentials, &key, attributes)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::memory::MemoryStore;
    use crate::record::{Attributes, StorageRecord};
    use cred_core::CredentialStatus;
    use cred_state::{CredentialDetails, Passport};

    fn passport(country: &str) -> Credential {
        Credential::new(
            CredentialId::new("AB123456").unwrap(),
            Timestamp::parse("t", "2020-06-01T00:00:00Z").unwrap(),
            Timestamp::parse("t", "2030-06-01T00:00:00Z").unwrap(),
            IssuingCountry::new(country).unwrap(),
            CredentialDetails::Passport(Passport {
                nationality: "Canadian".into(),
            }),
        )
        .unwrap()
    }

    fn repo() -> (Arc<MemoryStore>, KvCredentialRepository) {
        let store = Arc::new(MemoryStore::new());
        let repo = KvCredentialRepository::new(store.clone());
        (store, repo)
    }

    #[tokio::test]
    async fn create_then_get() {
        let (_, repo) = repo();
        let credential = passport("CA");
        repo.create(&credential).await.unwrap();
        let fetched = repo
            .get(
                credential.credential_id(),
                CredentialType::Passport,
                &IssuingCountry::new("ca").unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(fetched, credential);
    }

    #[tokio::test]
    async fn missing_is_not_found() {
        let (_, repo) = repo();
        let err = repo
            .get(
                &CredentialId::new("NOPE").unwrap(),
                CredentialType::DriversLicense,
                &IssuingCountry::new("ca").unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::CredentialNotFound { .. }));
        assert_eq!(
            err.to_string(),
            "credential with id 'NOPE' of type 'drivers_license' not found"
        );
    }

    #[tokio::test]
    async fn lookup_is_scoped_by_country_and_type() {
        let (_, repo) = repo();
        let credential = passport("ca");
        repo.create(&credential).await.unwrap();
        let other_country = repo
            .get(
                credential.credential_id(),
                CredentialType::Passport,
                &IssuingCountry::new("us").unwrap(),
            )
            .await;
        assert!(matches!(other_country, Err(RepositoryError::CredentialNotFound { .. })));
        let other_type = repo
            .get(
                credential.credential_id(),
                CredentialType::DriversLicense,
                credential.issuing_country(),
            )
            .await;
        assert!(matches!(other_type, Err(RepositoryError::CredentialNotFound { .. })));
    }

    #[tokio::test]
    async fn update_status_is_partial() {
        let (store, repo) = repo();
        let mut credential = passport("ca");
        repo.create(&credential).await.unwrap();
        let key = StorageKey::credential(
            credential.issuing_country(),
            credential.credential_id(),
            CredentialType::Passport,
        );
        let created = store.get(Table::Credentials, &key).await.unwrap().unwrap();

        credential.suspend("review").unwrap();
        repo.update_status(&credential).await.unwrap();

        let updated = store.get(Table::Credentials, &key).await.unwrap().unwrap();
        assert_eq!(updated.str("status").unwrap(), "suspended");
        assert_eq!(updated.str("suspension_reason").unwrap(), "review");
        assert_eq!(updated.get("created_at"), created.get("created_at"));
        assert_eq!(updated.get("nationality"), created.get("nationality"));

        let fetched = repo
            .get(credential.credential_id(), CredentialType::Passport, credential.issuing_country())
            .await
            .unwrap();
        assert_eq!(fetched.status(), CredentialStatus::Suspended);
    }

    #[tokio::test]
    async fn corrupt_record_is_storage_error() {
        let (store, repo) = repo();
        let key = StorageKey::credential(
            &IssuingCountry::new("ca").unwrap(),
            &CredentialId::new("X1").unwrap(),
            CredentialType::Passport,
        );
        store
            .put(Table::Credentials, StorageRecord::new(key, Attributes::new()))
            .await
            .unwrap();
        let err = repo
            .get(
                &CredentialId::new("X1").unwrap(),
                CredentialType::Passport,
                &IssuingCountry::new("ca").unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Storage(StorageError::MalformedRecord { .. })
        ));
    }
}
