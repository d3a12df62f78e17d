//! # Application Services
//!
//! Orchestration between the HTTP layer, the domain model and the
//! repositories. The services hold no rules of their own beyond the
//! issuer policy check on creation; lifecycle rules live on
//! [`Credential`].

use std::sync::Arc;

use thiserror::Error;

use cred_core::{
    CredentialId, CredentialStatus, CredentialType, IssuerCategory, IssuingCountry, Timestamp,
};
use cred_state::{ApiKey, ApiKeySecret, Credential, CredentialError, GeneratedApiKey, IssuerPolicy};
use cred_store::{ApiKeyRepository, CredentialRepository, RepositoryError, StorageError};

/// Errors surfaced by the application services. Kinds are preserved so the
/// HTTP layer can map each one to its own status code.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] CredentialError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

// ── Credentials ─────────────────────────────────────────────────────

/// Credential lookup, validation, creation and status updates.
#[derive(Clone)]
pub struct CredentialService {
    repository: Arc<dyn CredentialRepository>,
    issuer_policy: IssuerPolicy,
}

impl CredentialService {
    pub fn new(repository: Arc<dyn CredentialRepository>, issuer_policy: IssuerPolicy) -> Self {
        Self {
            repository,
            issuer_policy,
        }
    }

    pub fn issuer_policy(&self) -> IssuerPolicy {
        self.issuer_policy
    }

    /// Fetch a credential by its composite key.
    pub async fn get_credential(
        &self,
        credential_id: &CredentialId,
        credential_type: CredentialType,
        issuing_country: &IssuingCountry,
    ) -> Result<Credential, ServiceError> {
        Ok(self
            .repository
            .get(credential_id, credential_type, issuing_country)
            .await?)
    }

    /// Current status of a stored credential.
    pub async fn validate_credential(
        &self,
        credential_id: &CredentialId,
        credential_type: CredentialType,
        issuing_country: &IssuingCountry,
    ) -> Result<CredentialStatus, ServiceError> {
        let credential = self
            .get_credential(credential_id, credential_type, issuing_country)
            .await?;
        Ok(credential.status())
    }

    /// Persist a new credential. `issuer` is the category of the calling
    /// API key; it is only consulted when the issuer policy is enforced.
    pub async fn create_credential(
        &self,
        credential: Credential,
        issuer: Option<IssuerCategory>,
    ) -> Result<Credential, ServiceError> {
        self.issuer_policy
            .check(credential.credential_type(), issuer)?;
        self.repository.create(&credential).await?;

        metrics::counter!(
            "credentials_created_total",
            "credential_type" => credential.credential_type().as_str()
        )
        .increment(1);
        tracing::info!(
            credential_id = %credential.credential_id(),
            credential_type = %credential.credential_type(),
            issuing_country = %credential.issuing_country(),
            "credential created"
        );
        Ok(credential)
    }

    /// Fetch, transition and write back a credential's status.
    ///
    /// A missing credential fails with not-found before any transition runs.
    pub async fn update_credential(
        &self,
        credential_id: &CredentialId,
        issuing_country: &IssuingCountry,
        credential_type: CredentialType,
        new_status: CredentialStatus,
        reason: Option<&str>,
    ) -> Result<Credential, ServiceError> {
        let mut credential = self
            .get_credential(credential_id, credential_type, issuing_country)
            .await?;
        let previous = credential.status();

        credential.update_status(new_status, reason)?;
        self.repository.update_status(&credential).await?;

        metrics::counter!(
            "credential_status_transitions_total",
            "status" => new_status.as_str()
        )
        .increment(1);
        tracing::info!(
            credential_id = %credential_id,
            credential_type = %credential_type,
            from = %previous,
            to = %new_status,
            "credential status updated"
        );
        Ok(credential)
    }
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("issuer_policy", &self.issuer_policy)
            .finish_non_exhaustive()
    }
}

// ── API keys ────────────────────────────────────────────────────────

/// API key issuance and lookup.
#[derive(Clone)]
pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
}

impl ApiKeyService {
    pub fn new(repository: Arc<dyn ApiKeyRepository>) -> Self {
        Self { repository }
    }

    /// Generate and store a new key. The plaintext is only available on the
    /// returned value.
    pub async fn generate(
        &self,
        description: Option<String>,
        issuer_category: Option<IssuerCategory>,
    ) -> Result<GeneratedApiKey, ServiceError> {
        let generated = ApiKey::generate(description, issuer_category);
        self.repository.store(&generated.api_key).await?;
        tracing::info!(
            issuer_category = ?generated.api_key.issuer_category,
            "api key generated"
        );
        Ok(generated)
    }

    /// Look up the key matching `secret` and record its use.
    ///
    /// A failure to record the use is logged and ignored.
    pub async fn validate(&self, secret: &ApiKeySecret) -> Result<Option<ApiKey>, ServiceError> {
        let digest = secret.digest();
        let Some(mut api_key) = self.repository.get(&digest).await? else {
            return Ok(None);
        };

        let now = Timestamp::now();
        match self.repository.touch(&digest, now).await {
            Ok(()) => api_key.last_used = Some(now),
            Err(e) => tracing::warn!(error = %e, "failed to update api key last_used"),
        }
        Ok(Some(api_key))
    }
}

impl std::fmt::Debug for ApiKeyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cred_state::{CredentialDetails, Passport};
    use cred_store::{KvApiKeyRepository, KvCredentialRepository, MemoryStore};

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse("t", s).unwrap()
    }

    fn passport(id: &str) -> Credential {
        Credential::new(
            CredentialId::new(id).unwrap(),
            ts("2020-06-01T00:00:00Z"),
            ts("2099-06-01T00:00:00Z"),
            IssuingCountry::new("ca").unwrap(),
            CredentialDetails::Passport(Passport {
                nationality: "canadian".into(),
            }),
        )
        .unwrap()
    }

    fn credential_service(policy: IssuerPolicy) -> CredentialService {
        let store = Arc::new(MemoryStore::new());
        CredentialService::new(Arc::new(KvCredentialRepository::new(store)), policy)
    }

    fn ca() -> IssuingCountry {
        IssuingCountry::new("ca").unwrap()
    }

    // ── credential service ──

    #[tokio::test]
    async fn test_create_then_validate() {
        let service = credential_service(IssuerPolicy::Disabled);
        service.create_credential(passport("AB1"), None).await.unwrap();

        let status = service
            .validate_credential(&CredentialId::new("AB1").unwrap(), CredentialType::Passport, &ca())
            .await
            .unwrap();
        assert_eq!(status, CredentialStatus::Active);
    }

    #[tokio::test]
    async fn test_update_persists_transition() {
        let service = credential_service(IssuerPolicy::Disabled);
        service.create_credential(passport("AB2"), None).await.unwrap();
        let id = CredentialId::new("AB2").unwrap();

        let updated = service
            .update_credential(&id, &ca(), CredentialType::Passport, CredentialStatus::Suspended, Some("lost"))
            .await
            .unwrap();
        assert_eq!(updated.status(), CredentialStatus::Suspended);

        let stored = service
            .get_credential(&id, CredentialType::Passport, &ca())
            .await
            .unwrap();
        assert_eq!(stored.status(), CredentialStatus::Suspended);
        assert_eq!(stored.suspension_reason(), Some("lost"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let service = credential_service(IssuerPolicy::Disabled);
        let err = service
            .update_credential(
                &CredentialId::new("NOPE").unwrap(),
                &ca(),
                CredentialType::Passport,
                CredentialStatus::Revoked,
                // An empty reason would fail the transition; not-found must win.
                Some(""),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Repository(RepositoryError::CredentialNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_illegal_transition_leaves_storage_untouched() {
        let service = credential_service(IssuerPolicy::Disabled);
        service.create_credential(passport("AB3"), None).await.unwrap();
        let id = CredentialId::new("AB3").unwrap();
        service
            .update_credential(&id, &ca(), CredentialType::Passport, CredentialStatus::Revoked, Some("fraud"))
            .await
            .unwrap();

        let err = service
            .update_credential(&id, &ca(), CredentialType::Passport, CredentialStatus::Active, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(CredentialError::InvalidState(_))));

        let stored = service
            .get_credential(&id, CredentialType::Passport, &ca())
            .await
            .unwrap();
        assert_eq!(stored.status(), CredentialStatus::Revoked);
        assert_eq!(stored.revocation_reason(), Some("fraud"));
    }

    #[tokio::test]
    async fn test_enforced_policy_rejects_wrong_issuer() {
        let service = credential_service(IssuerPolicy::Enforce);
        let err = service
            .create_credential(passport("AB4"), Some(IssuerCategory::Provincial))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(CredentialError::UnauthorizedIssuer { .. })
        ));

        service
            .create_credential(passport("AB4"), Some(IssuerCategory::Federal))
            .await
            .unwrap();
    }

    // ── api key service ──

    #[tokio::test]
    async fn test_generate_then_validate_records_use() {
        let store = Arc::new(MemoryStore::new());
        let service = ApiKeyService::new(Arc::new(KvApiKeyRepository::new(store)));

        let generated = service
            .generate(Some("ontario".into()), Some(IssuerCategory::Provincial))
            .await
            .unwrap();
        assert!(generated.api_key.last_used.is_none());

        let found = service.validate(&generated.secret).await.unwrap().unwrap();
        assert_eq!(found.key_digest, generated.api_key.key_digest);
        assert!(found.last_used.is_some());
    }

    #[tokio::test]
    async fn test_unknown_key_is_none() {
        let store = Arc::new(MemoryStore::new());
        let service = ApiKeyService::new(Arc::new(KvApiKeyRepository::new(store)));
        assert!(service
            .validate(&ApiKeySecret::new("not-a-real-key"))
            .await
            .unwrap()
            .is_none());
    }

    /// Repository whose last-used update always fails.
    struct FailingTouch {
        key: ApiKey,
    }

    #[async_trait]
    impl ApiKeyRepository for FailingTouch {
        async fn store(&self, _api_key: &ApiKey) -> Result<(), StorageError> {
            Ok(())
        }

        async fn get(&self, key_digest: &str) -> Result<Option<ApiKey>, StorageError> {
            Ok((key_digest == self.key.key_digest).then(|| self.key.clone()))
        }

        async fn touch(&self, _key_digest: &str, _at: Timestamp) -> Result<(), StorageError> {
            Err(StorageError::Operation("write refused".into()))
        }
    }

    #[tokio::test]
    async fn test_touch_failure_is_ignored() {
        let generated = ApiKey::generate(None, None);
        let service = ApiKeyService::new(Arc::new(FailingTouch {
            key: generated.api_key.clone(),
        }));
        let found = service.validate(&generated.secret).await.unwrap().unwrap();
        assert_eq!(found.key_digest, generated.api_key.key_digest);
        assert!(found.last_used.is_none());
    }
}
