use thiserror::Error;

use cred_core::{CredentialType, Timestamp, ValidationError};

/// Errors raised by the credential domain model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// A field failed validation at construction.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested status transition is not allowed.
    #[error("{0}")]
    InvalidState(String),

    /// The credential's validity window has closed.
    #[error("credential has expired on {valid_until}")]
    Expired {
        /// End of the validity window.
        valid_until: Timestamp,
    },

    /// The caller's issuer category may not create this credential type.
    #[error("issuer '{issuer}' is not authorized to issue credential of type '{credential_type}'")]
    UnauthorizedIssuer {
        /// Issuer category of the caller, or `unknown`.
        issuer: String,
        /// The credential type being created.
        credential_type: CredentialType,
    },
}

impl CredentialError {
    pub(crate) fn invalid_state(message: &str) -> Self {
        Self::InvalidState(message.to_string())
    }
}
