//! # Issuer Authorization Policy
//!
//! Each [`CredentialType`] names the issuer categories allowed to create it
//! (see [`CredentialType::authorized_issuers`]). Whether that table is
//! enforced is a deployment decision, so the check is wrapped in a policy
//! value chosen at startup.

use std::str::FromStr;

use cred_core::{CredentialType, IssuerCategory};

use crate::error::CredentialError;

/// Whether issuer categories are checked on credential creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssuerPolicy {
    /// Any authenticated caller may create any credential type.
    #[default]
    Disabled,
    /// The caller's issuer category must be authorized for the type.
    Enforce,
}

impl IssuerPolicy {
    /// Check whether `issuer` may create a credential of `credential_type`.
    ///
    /// Under [`IssuerPolicy::Enforce`] a caller with no category is rejected.
    pub fn check(
        &self,
        credential_type: CredentialType,
        issuer: Option<IssuerCategory>,
    ) -> Result<(), CredentialError> {
        match (self, issuer) {
            (Self::Disabled, _) => Ok(()),
            (Self::Enforce, Some(category)) if credential_type.is_authorized_issuer(category) => {
                Ok(())
            }
            (Self::Enforce, other) => Err(CredentialError::UnauthorizedIssuer {
                issuer: other.map_or_else(|| "unknown".to_string(), |c| c.to_string()),
                credential_type,
            }),
        }
    }
}

impl FromStr for IssuerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" | "disabled" => Ok(Self::Disabled),
            "enforce" => Ok(Self::Enforce),
            other => Err(format!(
                "unknown issuer authorization mode {other:?} (expected \"off\" or \"enforce\")"
            )),
        }
    }
}

impl std::fmt::Display for IssuerPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Disabled => "off",
            Self::Enforce => "enforce",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_allows_everything() {
        let policy = IssuerPolicy::Disabled;
        for t in CredentialType::ALL {
            assert!(policy.check(t, None).is_ok());
            assert!(policy.check(t, Some(IssuerCategory::Federal)).is_ok());
            assert!(policy.check(t, Some(IssuerCategory::Provincial)).is_ok());
        }
    }

    #[test]
    fn test_enforce_follows_authorization_table() {
        let policy = IssuerPolicy::Enforce;
        assert!(policy
            .check(CredentialType::DriversLicense, Some(IssuerCategory::Provincial))
            .is_ok());
        assert!(policy
            .check(CredentialType::Passport, Some(IssuerCategory::Federal))
            .is_ok());

        let err = policy
            .check(CredentialType::Passport, Some(IssuerCategory::Provincial))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "issuer 'provincial' is not authorized to issue credential of type 'passport'"
        );
    }

    #[test]
    fn test_enforce_rejects_uncategorized_caller() {
        let err = IssuerPolicy::Enforce
            .check(CredentialType::DriversLicense, None)
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialError::UnauthorizedIssuer { ref issuer, .. } if issuer == "unknown"
        ));
    }

    #[test]
    fn test_parse() {
        assert_eq!("off".parse::<IssuerPolicy>().unwrap(), IssuerPolicy::Disabled);
        assert_eq!("enforce".parse::<IssuerPolicy>().unwrap(), IssuerPolicy::Enforce);
        assert!("strict".parse::<IssuerPolicy>().is_err());
        assert_eq!(IssuerPolicy::default().to_string(), "off");
    }
}
