//! # Assemblers: Wire DTO ⇄ Domain
//!
//! One [`CredentialAssembler`] per credential type, held by an
//! [`AssemblerRegistry`] that is built once at startup and injected through
//! [`AppState`](crate::state::AppState).
//!
//! ## Inbound
//!
//! `to_domain` deserializes the raw JSON object into the typed DTO and
//! reports a missing or malformed field by name
//! ([`AssemblerError::DataValidation`]). The DTO is then turned into a
//! domain [`Credential`], which always starts out `Active`: a `status`
//! field in the payload is validated but not applied.
//!
//! ## Outbound
//!
//! `to_dto` projects every domain field, lifecycle state included.

mod drivers_license;
mod passport;

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;
use thiserror::Error;

use cred_core::{CredentialId, CredentialType, IssuingCountry, Timestamp, ValidationError};
use cred_state::{Credential, CredentialDetails, CredentialError};

use crate::dto::{CommonCredentialDto, CredentialDto};

pub use drivers_license::DriversLicenseAssembler;
pub use passport::PassportAssembler;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure converting between wire and domain representations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblerError {
    /// A payload field is missing or malformed.
    #[error("invalid credential data for field '{field}': {detail}")]
    DataValidation { field: String, detail: String },

    /// No assembler is registered for the requested type string.
    #[error("unsupported credential type: {0}")]
    UnsupportedType(String),

    /// The assembler was handed a credential of another type.
    #[error("assembler for '{expected}' cannot convert a '{actual}' credential")]
    TypeMismatch {
        expected: CredentialType,
        actual: CredentialType,
    },

    /// The domain model rejected the assembled values.
    #[error(transparent)]
    Domain(#[from] CredentialError),
}

impl AssemblerError {
    pub(crate) fn field(field: &str, detail: impl Into<String>) -> Self {
        Self::DataValidation {
            field: field.to_string(),
            detail: detail.into(),
        }
    }
}

impl From<ValidationError> for AssemblerError {
    fn from(err: ValidationError) -> Self {
        match err.field() {
            Some(field) => Self::field(field, err.to_string()),
            None => Self::Domain(CredentialError::Validation(err)),
        }
    }
}

// ---------------------------------------------------------------------------
// Assembler trait
// ---------------------------------------------------------------------------

/// Converts one credential type between its DTO and the domain model.
pub trait CredentialAssembler: Send + Sync {
    /// The type this assembler handles.
    fn credential_type(&self) -> CredentialType;

    /// Project a domain credential onto its DTO.
    fn to_dto(&self, credential: &Credential) -> Result<CredentialDto, AssemblerError>;

    /// Parse a wire payload into a new, `Active` domain credential.
    fn to_domain(&self, payload: &Value) -> Result<Credential, AssemblerError>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Closed mapping from credential type to assembler.
pub struct AssemblerRegistry {
    assemblers: BTreeMap<CredentialType, Box<dyn CredentialAssembler>>,
}

impl AssemblerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            assemblers: BTreeMap::new(),
        }
    }

    /// A registry holding an assembler for every supported type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DriversLicenseAssembler));
        registry.register(Box::new(PassportAssembler));
        registry
    }

    /// Add or replace the assembler for its type.
    pub fn register(&mut self, assembler: Box<dyn CredentialAssembler>) {
        self.assemblers
            .insert(assembler.credential_type(), assembler);
    }

    /// Assembler for a parsed type.
    pub fn get(
        &self,
        credential_type: CredentialType,
    ) -> Result<&dyn CredentialAssembler, AssemblerError> {
        self.assemblers
            .get(&credential_type)
            .map(|a| a.as_ref())
            .ok_or_else(|| AssemblerError::UnsupportedType(credential_type.to_string()))
    }

    /// Resolve a raw `credential_type` string, as received on the query
    /// string, to its type and assembler.
    pub fn resolve(
        &self,
        raw: &str,
    ) -> Result<(CredentialType, &dyn CredentialAssembler), AssemblerError> {
        let credential_type = CredentialType::from_str(raw)
            .map_err(|_| AssemblerError::UnsupportedType(raw.to_string()))?;
        Ok((credential_type, self.get(credential_type)?))
    }

    /// Registered types, in stable order.
    pub fn supported_types(&self) -> Vec<CredentialType> {
        self.assemblers.keys().copied().collect()
    }
}

impl Default for AssemblerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for AssemblerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssemblerRegistry")
            .field("types", &self.supported_types())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Deserialize a credential payload into its typed DTO.
///
/// The common fields are read on their own first, because serde drops the
/// path to a failing field inside a `#[serde(flatten)]` struct.
pub(crate) fn parse_payload<T: DeserializeOwned>(payload: &Value) -> Result<T, AssemblerError> {
    if !payload.is_object() {
        return Err(AssemblerError::field("body", "expected a JSON object"));
    }
    deserialize::<CommonCredentialDto>(payload)?;
    deserialize(payload)
}

fn deserialize<T: DeserializeOwned>(payload: &Value) -> Result<T, AssemblerError> {
    serde_path_to_error::deserialize(payload).map_err(|err| {
        let field = err.path().iter().find_map(|segment| match segment {
            Segment::Map { key } => Some(key.clone()),
            _ => None,
        });
        let inner = err.into_inner();
        let field = field
            .or_else(|| missing_field(&inner))
            .unwrap_or_else(|| "body".to_string());
        AssemblerError::field(&field, inner.to_string())
    })
}

/// A missing field is reported against the enclosing object, so its name
/// only appears in the message.
fn missing_field(err: &serde_json::Error) -> Option<String> {
    let message = err.to_string();
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next().map(str::to_string)
}

/// Project the common domain fields onto the wire.
pub(crate) fn common_to_dto(credential: &Credential) -> CommonCredentialDto {
    CommonCredentialDto {
        credential_id: credential.credential_id().to_string(),
        valid_from: credential.valid_from().to_iso8601(),
        valid_until: credential.valid_until().to_iso8601(),
        issuing_country: credential.issuing_country().to_string(),
        status: credential.status(),
        suspension_reason: credential.suspension_reason().map(str::to_string),
        revocation_reason: credential.revocation_reason().map(str::to_string),
    }
}

/// Build a new domain credential from the common DTO fields plus the
/// variant payload.
pub(crate) fn build_credential(
    common: &CommonCredentialDto,
    details: CredentialDetails,
) -> Result<Credential, AssemblerError> {
    let credential_id = CredentialId::new(common.credential_id.as_str())?;
    let valid_from = Timestamp::parse("valid_from", &common.valid_from)?;
    let valid_until = Timestamp::parse("valid_until", &common.valid_until)?;
    let issuing_country = IssuingCountry::new(&common.issuing_country)?;
    Credential::new(credential_id, valid_from, valid_until, issuing_country, details)
        .map_err(|err| match err {
            CredentialError::Validation(v) => AssemblerError::from(v),
            other => AssemblerError::Domain(other),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cred_core::CredentialStatus;
    use serde_json::json;

    use crate::dto::DriversLicenseDto;

    #[test]
    fn registry_resolves_known_types() {
        let registry = AssemblerRegistry::with_defaults();
        let (ty, assembler) = registry.resolve("drivers_license").unwrap();
        assert_eq!(ty, CredentialType::DriversLicense);
        assert_eq!(assembler.credential_type(), CredentialType::DriversLicense);

        let (ty, _) = registry.resolve("passport").unwrap();
        assert_eq!(ty, CredentialType::Passport);
    }

    #[test]
    fn registry_rejects_unknown_type() {
        let registry = AssemblerRegistry::with_defaults();
        let err = registry.resolve("unknown_type").err().unwrap();
        assert_eq!(err, AssemblerError::UnsupportedType("unknown_type".into()));
    }

    #[test]
    fn empty_registry_reports_unsupported() {
        let registry = AssemblerRegistry::new();
        assert!(matches!(
            registry.resolve("passport").err(),
            Some(AssemblerError::UnsupportedType(_))
        ));
        assert!(registry.supported_types().is_empty());
    }

    #[test]
    fn supported_types_are_ordered() {
        let registry = AssemblerRegistry::with_defaults();
        assert_eq!(
            registry.supported_types(),
            vec![CredentialType::DriversLicense, CredentialType::Passport]
        );
    }

    fn license_body() -> Value {
        json!({
            "credential_id": "X1",
            "valid_from": "2024-01-01T00:00:00Z",
            "valid_until": "2025-01-01T00:00:00Z",
            "issuing_country": "ca",
            "vehicle_classes": ["A"],
            "issuing_region": "ON"
        })
    }

    fn field_of(err: AssemblerError) -> String {
        match err {
            AssemblerError::DataValidation { field, .. } => field,
            other => panic!("expected DataValidation, got {other:?}"),
        }
    }

    #[test]
    fn payload_must_be_object() {
        let err = parse_payload::<DriversLicenseDto>(&json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(field_of(err), "body");
    }

    #[test]
    fn payload_parses_into_typed_dto() {
        let dto: DriversLicenseDto = parse_payload(&license_body()).unwrap();
        assert_eq!(dto.common.credential_id, "X1");
        assert_eq!(dto.common.status, CredentialStatus::Active);
        assert_eq!(dto.vehicle_classes, vec!["A".to_string()]);
    }

    #[test]
    fn missing_common_field_named() {
        let mut body = license_body();
        body.as_object_mut().unwrap().remove("valid_from");
        let err = parse_payload::<DriversLicenseDto>(&body).unwrap_err();
        assert!(err.to_string().contains("missing field"));
        assert_eq!(field_of(err), "valid_from");
    }

    #[test]
    fn wrong_type_in_common_field_named() {
        let mut body = license_body();
        body["issuing_country"] = json!(42);
        let err = parse_payload::<DriversLicenseDto>(&body).unwrap_err();
        assert_eq!(field_of(err), "issuing_country");
    }

    #[test]
    fn unknown_status_named() {
        let mut body = license_body();
        body["status"] = json!("paused");
        let err = parse_payload::<DriversLicenseDto>(&body).unwrap_err();
        assert_eq!(field_of(err), "status");
    }

    #[test]
    fn mixed_list_names_list_field() {
        let mut body = license_body();
        body["vehicle_classes"] = json!(["A", 2]);
        let err = parse_payload::<DriversLicenseDto>(&body).unwrap_err();
        assert_eq!(field_of(err), "vehicle_classes");
    }

    #[test]
    fn null_variant_field_named() {
        let mut body = license_body();
        body["issuing_region"] = Value::Null;
        let err = parse_payload::<DriversLicenseDto>(&body).unwrap_err();
        assert_eq!(field_of(err), "issuing_region");
    }

    #[test]
    fn validation_error_keeps_field() {
        let err = AssemblerError::from(ValidationError::MissingTimezone {
            field: "valid_until".into(),
        });
        assert!(matches!(err, AssemblerError::DataValidation { ref field, .. } if field == "valid_until"));
        assert!(err.to_string().contains("valid_until"));
    }
}
