//! # Validation Errors
//!
//! Structured error raised when a primitive value cannot be constructed.
//! Every variant that originates from a named input field carries that
//! field name, so the API layer can report exactly which part of a payload
//! was rejected.

use thiserror::Error;

/// A primitive value failed validation at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A timestamp was supplied without a UTC offset.
    #[error("{field} must be timezone-aware")]
    MissingTimezone {
        /// The input field holding the timestamp.
        field: String,
    },

    /// A timestamp could not be parsed as ISO-8601 / RFC 3339.
    #[error("{field} is not a valid ISO-8601 timestamp: {detail}")]
    InvalidTimestamp {
        /// The input field holding the timestamp.
        field: String,
        /// Parser diagnostic.
        detail: String,
    },

    /// `valid_until` precedes `valid_from`.
    #[error("valid_until ({valid_until}) must not be before valid_from ({valid_from})")]
    InvalidValidityWindow {
        /// Start of the rejected window.
        valid_from: String,
        /// End of the rejected window.
        valid_until: String,
    },

    /// An identifier violates its format rules.
    #[error("invalid {field}: {reason}")]
    InvalidIdentifier {
        /// The identifier field.
        field: String,
        /// Which rule was violated.
        reason: String,
    },

    /// A status string is not one of `active`, `suspended`, `revoked`.
    #[error("unknown credential status: {0:?}")]
    UnknownStatus(String),

    /// A credential type string does not name a supported variant.
    #[error("unsupported credential type: {0}")]
    UnknownCredentialType(String),

    /// An issuer category string is not one of `provincial`, `federal`.
    #[error("unknown issuer category: {0:?}")]
    UnknownIssuerCategory(String),
}

impl ValidationError {
    /// Name of the input field this error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingTimezone { field }
            | Self::InvalidTimestamp { field, .. }
            | Self::InvalidIdentifier { field, .. } => Some(field),
            Self::InvalidValidityWindow { .. } => Some("valid_until"),
            Self::UnknownStatus(_) => Some("status"),
            Self::UnknownCredentialType(_) => Some("credential_type"),
            Self::UnknownIssuerCategory(_) => Some("issuer_category"),
        }
    }

    pub(crate) fn identifier(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
