//! # Wire DTOs
//!
//! JSON shapes exchanged with API clients. Timestamps travel as RFC 3339
//! strings with a `Z` suffix and enums as their lowercase wire value.
//! Conversion to and from the domain model lives in [`crate::assembler`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use cred_core::{CredentialStatus, IssuerCategory};

use crate::extractors::Validate;

/// Longest accepted API key description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 256;

// ---------------------------------------------------------------------------
// Credential DTOs
// ---------------------------------------------------------------------------

/// Fields shared by every credential type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CommonCredentialDto {
    /// License or passport number.
    #[schema(example = "D1234-56789")]
    pub credential_id: String,
    /// Start of validity (RFC 3339, offset required).
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub valid_from: String,
    /// End of validity (RFC 3339, offset required).
    #[schema(example = "2029-12-31T00:00:00Z")]
    pub valid_until: String,
    #[schema(example = "ca")]
    pub issuing_country: String,
    #[serde(default)]
    #[schema(value_type = String, example = "active")]
    pub status: CredentialStatus,
    pub suspension_reason: Option<String>,
    pub revocation_reason: Option<String>,
}

/// Drivers license as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DriversLicenseDto {
    #[serde(flatten)]
    pub common: CommonCredentialDto,
    pub vehicle_classes: Vec<String>,
    #[schema(example = "ON")]
    pub issuing_region: String,
}

/// Passport as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PassportDto {
    #[serde(flatten)]
    pub common: CommonCredentialDto,
    #[schema(example = "canadian")]
    pub nationality: String,
}

/// Any credential DTO. The shape is selected by the `credential_type`
/// query parameter, never by the payload itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CredentialDto {
    DriversLicense(DriversLicenseDto),
    Passport(PassportDto),
}

impl CredentialDto {
    pub fn common(&self) -> &CommonCredentialDto {
        match self {
            Self::DriversLicense(dto) => &dto.common,
            Self::Passport(dto) => &dto.common,
        }
    }
}

// ---------------------------------------------------------------------------
// Status DTOs
// ---------------------------------------------------------------------------

/// Body of `PATCH /credentials/{issuing_country}/{credential_id}`.
///
/// Echoed back unchanged on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateDto {
    #[schema(value_type = String, example = "suspended")]
    pub status: CredentialStatus,
    /// Required when suspending or revoking.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Response of the validate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationResponse {
    pub id: String,
    #[schema(value_type = String, example = "active")]
    pub status: CredentialStatus,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// API key DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /api-keys`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GenerateApiKeyDto {
    #[serde(default)]
    pub description: Option<String>,
    /// `provincial` or `federal`.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "provincial")]
    pub issuer_category: Option<IssuerCategory>,
}

impl Validate for GenerateApiKeyDto {
    fn validate(&self) -> Result<(), String> {
        match &self.description {
            Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(format!(
                "description must not exceed {MAX_DESCRIPTION_LEN} characters"
            )),
            _ => Ok(()),
        }
    }
}

/// A freshly generated API key. `key` is shown only in this response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiKeyDto {
    pub key: String,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub issuer_category: Option<IssuerCategory>,
    #[schema(example = "2026-01-15T12:00:00Z")]
    pub created_at: String,
    pub last_used: Option<String>,
}
