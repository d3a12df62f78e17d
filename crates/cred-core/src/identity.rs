//! # Identifier Newtypes
//!
//! Newtype wrappers for the two identifiers that make up a credential's
//! storage address. Both end up inside a composite key of the form
//! `CRED#{issuing_country}#{credential_id}`, so neither may contain the `#`
//! delimiter. Validation happens once, in the constructor.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Composite storage key delimiter.
pub const KEY_DELIMITER: char = '#';

/// Upper bound on identifier length, in bytes.
pub const MAX_IDENTIFIER_LEN: usize = 128;

/// Opaque credential identifier (license number, passport number, ...).
///
/// Format rules shared by every credential type: non-empty, at most
/// [`MAX_IDENTIFIER_LEN`] bytes, no whitespace, no `#`. Type-specific rules
/// are applied on top of these by the credential variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CredentialId(String);

impl CredentialId {
    /// Create a validated credential identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        check_key_component("credential_id", &value)?;
        Ok(Self(value))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Issuing country, always stored and compared in lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssuingCountry(String);

impl IssuingCountry {
    /// Create an issuing country, normalizing to lowercase.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref().to_lowercase();
        check_key_component("issuing_country", &value)?;
        Ok(Self(value))
    }

    /// Borrow the lowercase country code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_key_component(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::identifier(field, "must not be empty"));
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::identifier(
            field,
            format!("must not exceed {MAX_IDENTIFIER_LEN} bytes"),
        ));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::identifier(field, "must not contain whitespace"));
    }
    if value.contains(KEY_DELIMITER) {
        return Err(ValidationError::identifier(
            field,
            format!("must not contain '{KEY_DELIMITER}'"),
        ));
    }
    Ok(())
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for IssuingCountry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CredentialId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CredentialId> for String {
    fn from(id: CredentialId) -> Self {
        id.0
    }
}

impl TryFrom<String> for IssuingCountry {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IssuingCountry> for String {
    fn from(country: IssuingCountry) -> Self {
        country.0
    }
}
