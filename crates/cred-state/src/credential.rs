//! # Credential Aggregate and Status State Machine
//!
//! ## States
//!
//! ```text
//! Active ──suspend(r)──▶ Suspended ──reinstate──▶ Active
//!   │  ▲                   │   │
//!   │  └── reinstate       │   └── suspend(r)  (re-suspend, reason replaced)
//!   │      (no-op)         │
//!   └──revoke(r)──▶ Revoked ◀──revoke(r)──┘
//!                     │
//!                     └── revoke(r)  (idempotent, reason replaced)
//! ```
//!
//! Suspending or reinstating a revoked credential fails with
//! [`CredentialError::InvalidState`], as does suspending or revoking with an
//! empty reason. Reinstating clears `suspension_reason`; revoking clears
//! nothing.

use cred_core::{
    CredentialId, CredentialStatus, CredentialType, IssuingCountry, Timestamp, ValidationError,
};

use crate::error::CredentialError;

// ─── Variant payloads ────────────────────────────────────────────────

/// Attributes specific to a drivers license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriversLicense {
    /// Vehicle class codes, in issuing order.
    pub vehicle_classes: Vec<String>,
    /// Province, state or region within the issuing country.
    pub issuing_region: String,
}

/// Attributes specific to a passport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passport {
    /// Nationality of the holder.
    pub nationality: String,
}

/// Variant-specific payload of a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialDetails {
    DriversLicense(DriversLicense),
    Passport(Passport),
}

impl CredentialDetails {
    /// Type discriminant of this payload.
    pub fn credential_type(&self) -> CredentialType {
        match self {
            Self::DriversLicense(_) => CredentialType::DriversLicense,
            Self::Passport(_) => CredentialType::Passport,
        }
    }

    /// Type-specific identifier rules, applied on top of the common rules
    /// enforced by [`CredentialId::new`].
    ///
    /// Passports allow ASCII alphanumerics only; drivers licenses also
    /// allow `-`.
    pub fn validate_id_format(&self, credential_id: &CredentialId) -> Result<(), ValidationError> {
        let (allowed, reason): (fn(char) -> bool, &str) = match self {
            Self::DriversLicense(_) => (
                |c| c.is_ascii_alphanumeric() || c == '-',
                "drivers license numbers may only contain ASCII letters, digits and '-'",
            ),
            Self::Passport(_) => (
                |c| c.is_ascii_alphanumeric(),
                "passport numbers may only contain ASCII letters and digits",
            ),
        };
        if credential_id.as_str().chars().all(allowed) {
            Ok(())
        } else {
            Err(ValidationError::InvalidIdentifier {
                field: "credential_id".to_string(),
                reason: reason.to_string(),
            })
        }
    }
}

// ─── Persisted snapshot ──────────────────────────────────────────────

/// Every field of a stored credential, including lifecycle state.
///
/// Input to [`Credential::rehydrate`]. Produced by storage mappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCredential {
    pub credential_id: CredentialId,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub issuing_country: IssuingCountry,
    pub status: CredentialStatus,
    pub suspension_reason: Option<String>,
    pub revocation_reason: Option<String>,
    pub details: CredentialDetails,
}

// ─── Credential ──────────────────────────────────────────────────────

/// An issued identity credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    credential_id: CredentialId,
    valid_from: Timestamp,
    valid_until: Timestamp,
    issuing_country: IssuingCountry,
    status: CredentialStatus,
    suspension_reason: Option<String>,
    revocation_reason: Option<String>,
    details: CredentialDetails,
}

impl Credential {
    /// Construct a new, `Active` credential.
    ///
    /// # Errors
    ///
    /// [`CredentialError::Validation`] when `valid_until` precedes
    /// `valid_from` or the identifier breaks the variant's format rules.
    pub fn new(
        credential_id: CredentialId,
        valid_from: Timestamp,
        valid_until: Timestamp,
        issuing_country: IssuingCountry,
        details: CredentialDetails,
    ) -> Result<Self, CredentialError> {
        if valid_until < valid_from {
            return Err(ValidationError::InvalidValidityWindow {
                valid_from: valid_from.to_iso8601(),
                valid_until: valid_until.to_iso8601(),
            }
            .into());
        }
        details.validate_id_format(&credential_id)?;
        Ok(Self {
            credential_id,
            valid_from,
            valid_until,
            issuing_country,
            status: CredentialStatus::Active,
            suspension_reason: None,
            revocation_reason: None,
            details,
        })
    }

    /// Restore a credential from storage, lifecycle state included.
    ///
    /// Runs the same construction checks as [`Credential::new`], then applies
    /// the persisted status and reasons as stored. No transition rules are
    /// replayed.
    pub fn rehydrate(persisted: PersistedCredential) -> Result<Self, CredentialError> {
        let mut credential = Self::new(
            persisted.credential_id,
            persisted.valid_from,
            persisted.valid_until,
            persisted.issuing_country,
            persisted.details,
        )?;
        credential.status = persisted.status;
        credential.suspension_reason = persisted.suspension_reason;
        credential.revocation_reason = persisted.revocation_reason;
        Ok(credential)
    }

    pub fn credential_id(&self) -> &CredentialId {
        &self.credential_id
    }

    pub fn valid_from(&self) -> Timestamp {
        self.valid_from
    }

    pub fn valid_until(&self) -> Timestamp {
        self.valid_until
    }

    pub fn issuing_country(&self) -> &IssuingCountry {
        &self.issuing_country
    }

    pub fn status(&self) -> CredentialStatus {
        self.status
    }

    pub fn suspension_reason(&self) -> Option<&str> {
        self.suspension_reason.as_deref()
    }

    pub fn revocation_reason(&self) -> Option<&str> {
        self.revocation_reason.as_deref()
    }

    pub fn details(&self) -> &CredentialDetails {
        &self.details
    }

    /// Type discriminant, used for storage routing and mapper dispatch.
    pub fn credential_type(&self) -> CredentialType {
        self.details.credential_type()
    }

    /// Re-check the identifier against the variant's format rules.
    pub fn validate_id_format(&self) -> Result<(), ValidationError> {
        self.details.validate_id_format(&self.credential_id)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Suspend (ACTIVE or SUSPENDED → SUSPENDED).
    pub fn suspend(&mut self, reason: &str) -> Result<(), CredentialError> {
        if reason.is_empty() {
            return Err(CredentialError::invalid_state(
                "suspension reason cannot be empty",
            ));
        }
        if self.status.is_terminal() {
            return Err(CredentialError::invalid_state(
                "cannot suspend a revoked credential",
            ));
        }
        self.status = CredentialStatus::Suspended;
        self.suspension_reason = Some(reason.to_string());
        Ok(())
    }

    /// Reinstate (SUSPENDED or ACTIVE → ACTIVE), clearing the suspension reason.
    pub fn reinstate(&mut self) -> Result<(), CredentialError> {
        if self.status.is_terminal() {
            return Err(CredentialError::invalid_state(
                "cannot reinstate a revoked credential",
            ));
        }
        self.status = CredentialStatus::Active;
        self.suspension_reason = None;
        Ok(())
    }

    /// Revoke permanently (any → REVOKED).
    pub fn revoke(&mut self, reason: &str) -> Result<(), CredentialError> {
        if reason.is_empty() {
            return Err(CredentialError::invalid_state(
                "revocation reason cannot be empty",
            ));
        }
        self.status = CredentialStatus::Revoked;
        self.revocation_reason = Some(reason.to_string());
        Ok(())
    }

    /// Move to `target`, dispatching to the matching transition.
    ///
    /// `reason` is required for suspend and revoke and ignored for
    /// reinstate. A missing reason is treated as empty.
    pub fn update_status(
        &mut self,
        target: CredentialStatus,
        reason: Option<&str>,
    ) -> Result<(), CredentialError> {
        match target {
            CredentialStatus::Suspended => self.suspend(reason.unwrap_or_default()),
            CredentialStatus::Revoked => self.revoke(reason.unwrap_or_default()),
            CredentialStatus::Active => self.reinstate(),
        }
    }

    // ── Validity ─────────────────────────────────────────────────────

    /// Whether the credential is usable at `now`.
    ///
    /// `Ok(false)` when not active or not yet valid.
    ///
    /// # Errors
    ///
    /// [`CredentialError::Expired`] when `now` is past `valid_until`,
    /// regardless of status.
    pub fn is_valid_at(&self, now: Timestamp) -> Result<bool, CredentialError> {
        if now > self.valid_until {
            return Err(CredentialError::Expired {
                valid_until: self.valid_until,
            });
        }
        Ok(self.status == CredentialStatus::Active && now >= self.valid_from)
    }

    /// [`Credential::is_valid_at`] evaluated at the current time.
    pub fn is_valid(&self) -> Result<bool, CredentialError> {
        self.is_valid_at(Timestamp::now())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse("t", s).unwrap()
    }

    fn license_details() -> CredentialDetails {
        CredentialDetails::DriversLicense(DriversLicense {
            vehicle_classes: vec!["A".into(), "B".into()],
            issuing_region: "ON".into(),
        })
    }

    fn make_license() -> Credential {
        Credential::new(
            CredentialId::new("D1234-56789").unwrap(),
            ts("2024-01-01T00:00:00Z"),
            ts("2029-12-31T00:00:00Z"),
            IssuingCountry::new("CA").unwrap(),
            license_details(),
        )
        .unwrap()
    }

    fn make_passport() -> Credential {
        Credential::new(
            CredentialId::new("AB123456").unwrap(),
            ts("2020-06-01T00:00:00Z"),
            ts("2030-06-01T00:00:00Z"),
            IssuingCountry::new("ca").unwrap(),
            CredentialDetails::Passport(Passport {
                nationality: "Canadian".into(),
            }),
        )
        .unwrap()
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn test_new_is_active_without_reasons() {
        let lic = make_license();
        assert_eq!(lic.status(), CredentialStatus::Active);
        assert_eq!(lic.suspension_reason(), None);
        assert_eq!(lic.revocation_reason(), None);
        assert_eq!(lic.issuing_country().as_str(), "ca");
        assert_eq!(lic.credential_type(), CredentialType::DriversLicense);
    }

    #[test]
    fn test_new_rejects_inverted_window() {
        let err = Credential::new(
            CredentialId::new("D1").unwrap(),
            ts("2025-01-02T00:00:00Z"),
            ts("2025-01-01T00:00:00Z"),
            IssuingCountry::new("ca").unwrap(),
            license_details(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CredentialError::Validation(ValidationError::InvalidValidityWindow { .. })
        ));
    }

    #[test]
    fn test_new_rejects_inverted_window_within_one_second() {
        let err = Credential::new(
            CredentialId::new("D1").unwrap(),
            ts("2024-01-01T00:00:00.900Z"),
            ts("2024-01-01T00:00:00.100Z"),
            IssuingCountry::new("ca").unwrap(),
            license_details(),
        )
        .unwrap_err();
        match err {
            CredentialError::Validation(ValidationError::InvalidValidityWindow {
                valid_from,
                valid_until,
            }) => {
                assert_eq!(valid_from, "2024-01-01T00:00:00.900Z");
                assert_eq!(valid_until, "2024-01-01T00:00:00.100Z");
            }
            other => panic!("expected InvalidValidityWindow, got {other:?}"),
        }
    }

    #[test]
    fn test_new_accepts_zero_length_window() {
        let t = ts("2025-01-01T00:00:00Z");
        let result = Credential::new(
            CredentialId::new("D1").unwrap(),
            t,
            t,
            IssuingCountry::new("ca").unwrap(),
            license_details(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_passport_rejects_dash_in_id() {
        let err = Credential::new(
            CredentialId::new("AB-1234").unwrap(),
            ts("2020-01-01T00:00:00Z"),
            ts("2030-01-01T00:00:00Z"),
            IssuingCountry::new("ca").unwrap(),
            CredentialDetails::Passport(Passport {
                nationality: "Canadian".into(),
            }),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CredentialError::Validation(ValidationError::InvalidIdentifier { ref field, .. })
                if field == "credential_id"
        ));
    }

    #[test]
    fn test_license_allows_dash_but_not_punctuation() {
        assert!(make_license().validate_id_format().is_ok());
        let details = license_details();
        assert!(details
            .validate_id_format(&CredentialId::new("D12.34").unwrap())
            .is_err());
    }

    // ── Transitions ──────────────────────────────────────────────────

    #[test]
    fn test_suspend_sets_reason() {
        let mut lic = make_license();
        lic.suspend("Unpaid fines").unwrap();
        assert_eq!(lic.status(), CredentialStatus::Suspended);
        assert_eq!(lic.suspension_reason(), Some("Unpaid fines"));
        assert_eq!(lic.revocation_reason(), None);
    }

    #[test]
    fn test_resuspend_replaces_reason() {
        let mut lic = make_license();
        lic.suspend("first").unwrap();
        lic.suspend("second").unwrap();
        assert_eq!(lic.status(), CredentialStatus::Suspended);
        assert_eq!(lic.suspension_reason(), Some("second"));
    }

    #[test]
    fn test_empty_reason_rejected() {
        let mut lic = make_license();
        assert!(matches!(lic.suspend(""), Err(CredentialError::InvalidState(_))));
        assert!(matches!(lic.revoke(""), Err(CredentialError::InvalidState(_))));
        assert_eq!(lic.status(), CredentialStatus::Active);
    }

    #[test]
    fn test_reinstate_clears_suspension_reason() {
        let mut lic = make_license();
        lic.suspend("audit").unwrap();
        lic.reinstate().unwrap();
        assert_eq!(lic.status(), CredentialStatus::Active);
        assert_eq!(lic.suspension_reason(), None);
    }

    #[test]
    fn test_reinstate_active_is_noop() {
        let mut lic = make_license();
        lic.reinstate().unwrap();
        assert_eq!(lic, make_license());
    }

    #[test]
    fn test_suspend_reinstate_suspend_has_fresh_reason() {
        let mut lic = make_license();
        lic.suspend("r1").unwrap();
        lic.reinstate().unwrap();
        lic.suspend("r2").unwrap();
        assert_eq!(lic.status(), CredentialStatus::Suspended);
        assert_eq!(lic.suspension_reason(), Some("r2"));
    }

    #[test]
    fn test_revoke_from_suspended_keeps_suspension_reason() {
        let mut lic = make_license();
        lic.suspend("audit").unwrap();
        lic.revoke("fraud").unwrap();
        assert_eq!(lic.status(), CredentialStatus::Revoked);
        assert_eq!(lic.revocation_reason(), Some("fraud"));
        assert_eq!(lic.suspension_reason(), Some("audit"));
    }

    #[test]
    fn test_revoked_is_terminal() {
        let mut lic = make_passport();
        lic.revoke("lost").unwrap();

        let err = lic.suspend("x").unwrap_err();
        assert_eq!(
            err,
            CredentialError::InvalidState("cannot suspend a revoked credential".into())
        );
        let err = lic.reinstate().unwrap_err();
        assert_eq!(
            err,
            CredentialError::InvalidState("cannot reinstate a revoked credential".into())
        );
        assert_eq!(lic.status(), CredentialStatus::Revoked);
    }

    #[test]
    fn test_rerevoke_is_idempotent() {
        let mut lic = make_passport();
        lic.revoke("lost").unwrap();
        lic.revoke("stolen").unwrap();
        assert_eq!(lic.status(), CredentialStatus::Revoked);
        assert_eq!(lic.revocation_reason(), Some("stolen"));
    }

    #[test]
    fn test_update_status_dispatch() {
        let mut lic = make_license();
        lic.update_status(CredentialStatus::Suspended, Some("audit"))
            .unwrap();
        assert_eq!(lic.status(), CredentialStatus::Suspended);
        lic.update_status(CredentialStatus::Active, Some("ignored"))
            .unwrap();
        assert_eq!(lic.status(), CredentialStatus::Active);
        assert!(lic.update_status(CredentialStatus::Revoked, None).is_err());
        lic.update_status(CredentialStatus::Revoked, Some("fraud"))
            .unwrap();
        assert_eq!(lic.status(), CredentialStatus::Revoked);
    }

    // ── Rehydration ──────────────────────────────────────────────────

    #[test]
    fn test_rehydrate_restores_lifecycle_state() {
        let persisted = PersistedCredential {
            credential_id: CredentialId::new("D1234-56789").unwrap(),
            valid_from: ts("2024-01-01T00:00:00Z"),
            valid_until: ts("2029-12-31T00:00:00Z"),
            issuing_country: IssuingCountry::new("ca").unwrap(),
            status: CredentialStatus::Suspended,
            suspension_reason: Some("audit".into()),
            revocation_reason: None,
            details: license_details(),
        };
        let lic = Credential::rehydrate(persisted).unwrap();
        assert_eq!(lic.status(), CredentialStatus::Suspended);
        assert_eq!(lic.suspension_reason(), Some("audit"));
    }

    #[test]
    fn test_rehydrate_still_checks_window() {
        let persisted = PersistedCredential {
            credential_id: CredentialId::new("AB1").unwrap(),
            valid_from: ts("2030-01-01T00:00:00Z"),
            valid_until: ts("2020-01-01T00:00:00Z"),
            issuing_country: IssuingCountry::new("ca").unwrap(),
            status: CredentialStatus::Revoked,
            suspension_reason: None,
            revocation_reason: Some("x".into()),
            details: CredentialDetails::Passport(Passport {
                nationality: "Canadian".into(),
            }),
        };
        assert!(Credential::rehydrate(persisted).is_err());
    }

    // ── Validity ─────────────────────────────────────────────────────

    #[test]
    fn test_is_valid_within_window() {
        let lic = make_license();
        assert!(lic.is_valid_at(ts("2026-01-01T00:00:00Z")).unwrap());
        assert!(lic.is_valid_at(ts("2029-12-31T00:00:00Z")).unwrap());
    }

    #[test]
    fn test_is_valid_false_before_window() {
        let lic = make_license();
        assert!(!lic.is_valid_at(ts("2023-12-31T23:59:59Z")).unwrap());
    }

    #[test]
    fn test_is_valid_false_when_suspended() {
        let mut lic = make_license();
        lic.suspend("audit").unwrap();
        assert!(!lic.is_valid_at(ts("2026-01-01T00:00:00Z")).unwrap());
    }

    #[test]
    fn test_is_valid_errors_after_window() {
        let lic = make_license();
        let err = lic.is_valid_at(ts("2030-01-01T00:00:00Z")).unwrap_err();
        assert_eq!(
            err,
            CredentialError::Expired {
                valid_until: ts("2029-12-31T00:00:00Z")
            }
        );
        assert_eq!(
            err.to_string(),
            "credential has expired on 2029-12-31T00:00:00Z"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Suspend(String),
        Revoke(String),
        Reinstate,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-z]{0,8}".prop_map(Op::Suspend),
            "[a-z]{0,8}".prop_map(Op::Revoke),
            Just(Op::Reinstate),
        ]
    }

    fn fresh(from: i64, len: i64) -> Credential {
        let start = Timestamp::parse("t", "2000-01-01T00:00:00Z").unwrap();
        let base = *start.as_datetime();
        let valid_from = Timestamp::from_utc(base + Duration::seconds(from));
        let valid_until = Timestamp::from_utc(base + Duration::seconds(from + len));
        Credential::new(
            CredentialId::new("P1").unwrap(),
            valid_from,
            valid_until,
            IssuingCountry::new("ca").unwrap(),
            CredentialDetails::Passport(Passport {
                nationality: "x".into(),
            }),
        )
        .unwrap()
    }

    proptest! {
        /// Any ordered window constructs an active credential with no reasons.
        #[test]
        fn ordered_window_always_constructs(from in 0i64..1_000_000_000, len in 0i64..1_000_000_000) {
            let c = fresh(from, len);
            prop_assert_eq!(c.status(), CredentialStatus::Active);
            prop_assert!(c.suspension_reason().is_none());
            prop_assert!(c.revocation_reason().is_none());
        }

        /// Status and reason fields stay consistent under any operation sequence.
        #[test]
        fn transitions_preserve_reason_invariants(ops in proptest::collection::vec(op(), 0..20)) {
            let mut c = fresh(0, 1);
            let mut revoked = false;
            for op in ops {
                let before = c.clone();
                let result = match &op {
                    Op::Suspend(r) => c.suspend(r),
                    Op::Revoke(r) => c.revoke(r),
                    Op::Reinstate => c.reinstate(),
                };
                if result.is_err() {
                    prop_assert_eq!(&c, &before, "failed transition mutated state");
                }
                revoked |= c.status() == CredentialStatus::Revoked;
                if revoked {
                    prop_assert_eq!(c.status(), CredentialStatus::Revoked);
                }
                match c.status() {
                    CredentialStatus::Active => {
                        prop_assert!(c.suspension_reason().is_none());
                        prop_assert!(c.revocation_reason().is_none());
                    }
                    CredentialStatus::Suspended => {
                        prop_assert!(c.suspension_reason().is_some_and(|r| !r.is_empty()));
                    }
                    CredentialStatus::Revoked => {
                        prop_assert!(c.revocation_reason().is_some_and(|r| !r.is_empty()));
                    }
                }
            }
        }
    }
}
