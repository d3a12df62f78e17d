//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps errors from the domain, assembler, repository and storage layers to
//! HTTP status codes with a JSON body carrying a machine-readable code, a
//! message and, for field-level validation failures, the offending field.
//! Server-side failures are logged and never echoed to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use cred_core::ValidationError;
use cred_state::CredentialError;
use cred_store::{RepositoryError, StorageError};

use crate::assembler::AssemblerError;
use crate::service::ServiceError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// `{"field": ...}` for field-level validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Request query or body could not be parsed (400).
    #[error("{0}")]
    BadRequest(String),

    /// A request field failed validation (400).
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Status transition not allowed from the current state (400).
    #[error("{0}")]
    InvalidState(String),

    /// Credential validity window has closed (400).
    #[error("{0}")]
    Expired(String),

    /// Unknown `credential_type` (400).
    #[error("{0}")]
    UnsupportedType(String),

    /// Missing or invalid credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is not allowed to perform the operation (403).
    #[error("{0}")]
    Forbidden(String),

    /// Storage backend unreachable (503). Message is logged, not returned.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure tied to a named field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::InvalidState(_) => (StatusCode::BAD_REQUEST, "INVALID_STATE"),
            Self::Expired(_) => (StatusCode::BAD_REQUEST, "CREDENTIAL_EXPIRED"),
            Self::UnsupportedType(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_TYPE"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::ServiceUnavailable(_) => "Storage is temporarily unavailable".to_string(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let details = match &self {
            Self::Validation {
                field: Some(field), ..
            } => Some(serde_json::json!({ "field": field })),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::UnknownCredentialType(_) => Self::UnsupportedType(err.to_string()),
            _ => Self::Validation {
                field: err.field().map(str::to_string),
                message: err.to_string(),
            },
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Validation(v) => v.into(),
            CredentialError::InvalidState(_) => Self::InvalidState(err.to_string()),
            CredentialError::Expired { .. } => Self::Expired(err.to_string()),
            CredentialError::UnauthorizedIssuer { .. } => Self::Forbidden(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        if err.is_connection() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::CredentialNotFound { .. } => Self::NotFound(err.to_string()),
            RepositoryError::Storage(e) => e.into(),
        }
    }
}

impl From<AssemblerError> for AppError {
    fn from(err: AssemblerError) -> Self {
        match err {
            AssemblerError::DataValidation { ref field, .. } => Self::field(field.clone(), err.to_string()),
            AssemblerError::UnsupportedType(_) => Self::UnsupportedType(err.to_string()),
            AssemblerError::TypeMismatch { .. } => Self::Internal(err.to_string()),
            AssemblerError::Domain(e) => e.into(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => e.into(),
            ServiceError::Repository(e) => e.into(),
            ServiceError::Storage(e) => e.into(),
        }
    }
}
