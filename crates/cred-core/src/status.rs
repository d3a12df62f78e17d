//! # Credential Status
//!
//! The three lifecycle states a credential can be in. Transition rules live
//! with the credential aggregate in `cred-state`; this module only owns the
//! vocabulary and its wire form.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lifecycle status of a credential.
///
/// ```text
/// Active ──suspend──▶ Suspended ──reinstate──▶ Active
///   │                    │
///   └──revoke──▶ Revoked ◀──revoke──┘
/// ```
///
/// `Revoked` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Active,
    Suspended,
    Revoked,
}

impl CredentialStatus {
    /// Every status, in declaration order.
    pub const ALL: [CredentialStatus; 3] = [Self::Active, Self::Suspended, Self::Revoked];

    /// Lowercase wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Revoked => "revoked",
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}

impl Default for CredentialStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl std::fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}
