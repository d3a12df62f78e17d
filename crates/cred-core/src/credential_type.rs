//! # Credential Types and Issuer Categories
//!
//! [`CredentialType`] is the closed set of supported credential variants.
//! It keys the assembler registry, selects the storage mapper, and forms the
//! sort key suffix of every stored credential (`METADATA#{type}`).
//!
//! [`IssuerCategory`] classifies the authority behind an API key. Each
//! credential type names the categories allowed to issue it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Supported credential variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialType {
    DriversLicense,
    Passport,
}

impl CredentialType {
    /// Every supported type.
    pub const ALL: [CredentialType; 2] = [Self::DriversLicense, Self::Passport];

    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DriversLicense => "drivers_license",
            Self::Passport => "passport",
        }
    }

    /// Issuer categories permitted to create credentials of this type.
    ///
    /// Drivers licenses are issued provincially, passports federally.
    pub fn authorized_issuers(&self) -> &'static [IssuerCategory] {
        match self {
            Self::DriversLicense => &[IssuerCategory::Provincial],
            Self::Passport => &[IssuerCategory::Federal],
        }
    }

    /// Whether `issuer` may create credentials of this type.
    pub fn is_authorized_issuer(&self, issuer: IssuerCategory) -> bool {
        self.authorized_issuers().contains(&issuer)
    }
}

impl std::fmt::Display for CredentialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCredentialType(s.to_string()))
    }
}

/// Kind of authority an API key was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssuerCategory {
    Provincial,
    Federal,
}

impl IssuerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provincial => "provincial",
            Self::Federal => "federal",
        }
    }
}

impl std::fmt::Display for IssuerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssuerCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provincial" => Ok(Self::Provincial),
            "federal" => Ok(Self::Federal),
            other => Err(ValidationError::UnknownIssuerCategory(other.to_string())),
        }
    }
}
