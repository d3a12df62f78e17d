//! Storage and repository errors.

use thiserror::Error;

use cred_core::{CredentialId, CredentialType};

/// Failure of a key-value operation or of decoding its result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend could not be reached.
    #[error("storage connection error: {0}")]
    Connection(String),

    /// The backend rejected or failed the operation.
    #[error("storage operation failed: {0}")]
    Operation(String),

    /// A stored record is missing a field or holds an unusable value.
    #[error("malformed record field '{field}': {detail}")]
    MalformedRecord {
        /// Attribute name.
        field: String,
        /// What was wrong with it.
        detail: String,
    },

    /// A value could not be encoded for storage.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    pub(crate) fn malformed(field: &str, detail: impl Into<String>) -> Self {
        Self::MalformedRecord {
            field: field.to_string(),
            detail: detail.into(),
        }
    }

    /// Whether the failure is a connectivity problem rather than a bad
    /// operation.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Errors surfaced by [`CredentialRepository`](crate::CredentialRepository).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No credential is stored under the requested composite key.
    #[error("credential with id '{credential_id}' of type '{credential_type}' not found")]
    CredentialNotFound {
        credential_id: CredentialId,
        credential_type: CredentialType,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
