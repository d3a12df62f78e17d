//! # Credential Mappers: Domain ⇄ Storage Record
//!
//! One mapper per credential type. [`MapperProvider::mapper_for`] selects the
//! mapper from the [`CredentialType`] discriminant; there is no string
//! lookup on this path.
//!
//! A stored credential record carries every domain field plus bookkeeping
//! attributes `created_at`, `updated_at` and `version`. `version` is always
//! written as [`RECORD_VERSION`] and never compared on write.
//!
//! Reading a record goes through [`Credential::rehydrate`], so persisted
//! suspension and revocation state comes back intact.

use serde_json::{json, Value};

use cred_core::{CredentialId, CredentialType, IssuingCountry, Timestamp};
use cred_state::{
    Credential, CredentialDetails, DriversLicense, Passport, PersistedCredential,
};

use crate::error::StorageError;
use crate::record::{Attributes, StorageKey, StorageRecord};

/// Value of the `version` attribute on every credential record.
pub const RECORD_VERSION: u64 = 1;

/// Converts one credential type between domain and storage form.
pub trait CredentialMapper: Send + Sync {
    /// Type this mapper handles.
    fn credential_type(&self) -> CredentialType;

    /// Build the full storage record. `now` stamps `created_at` and
    /// `updated_at`.
    fn to_storage(&self, credential: &Credential, now: Timestamp)
        -> Result<StorageRecord, StorageError>;

    /// Rebuild the domain credential, lifecycle state included.
    fn to_domain(&self, record: &StorageRecord) -> Result<Credential, StorageError>;
}

/// Drivers license records: common fields plus `vehicle_classes` and
/// `issuing_region`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriversLicenseMapper;

/// Passport records: common fields plus `nationality`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassportMapper;

impl CredentialMapper for DriversLicenseMapper {
    fn credential_type(&self) -> CredentialType {
        CredentialType::DriversLicense
    }

    fn to_storage(
        &self,
        credential: &Credential,
        now: Timestamp,
    ) -> Result<StorageRecord, StorageError> {
        let CredentialDetails::DriversLicense(license) = credential.details() else {
            return Err(type_mismatch(self.credential_type(), credential));
        };
        let mut attributes = common_attributes(credential, now);
        attributes.insert("vehicle_classes".into(), json!(license.vehicle_classes));
        attributes.insert("issuing_region".into(), json!(license.issuing_region));
        Ok(StorageRecord::new(storage_key(credential), attributes))
    }

    fn to_domain(&self, record: &StorageRecord) -> Result<Credential, StorageError> {
        let details = CredentialDetails::DriversLicense(DriversLicense {
            vehicle_classes: record.str_list("vehicle_classes")?,
            issuing_region: record.str("issuing_region")?.to_string(),
        });
        rehydrate(self.credential_type(), record, details)
    }
}

impl CredentialMapper for PassportMapper {
    fn credential_type(&self) -> CredentialType {
        CredentialType::Passport
    }

    fn to_storage(
        &self,
        credential: &Credential,
        now: Timestamp,
    ) -> Result<StorageRecord, StorageError> {
        let CredentialDetails::Passport(passport) = credential.details() else {
            return Err(type_mismatch(self.credential_type(), credential));
        };
        let mut attributes = common_attributes(credential, now);
        attributes.insert("nationality".into(), json!(passport.nationality));
        Ok(StorageRecord::new(storage_key(credential), attributes))
    }

    fn to_domain(&self, record: &StorageRecord) -> Result<Credential, StorageError> {
        let details = CredentialDetails::Passport(Passport {
            nationality: record.str("nationality")?.to_string(),
        });
        rehydrate(self.credential_type(), record, details)
    }
}

/// Selects the mapper for a credential type.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapperProvider;

impl MapperProvider {
    pub fn mapper_for(&self, credential_type: CredentialType) -> &'static dyn CredentialMapper {
        match credential_type {
            CredentialType::DriversLicense => &DriversLicenseMapper,
            CredentialType::Passport => &PassportMapper,
        }
    }
}

/// Attributes written by a status update: `status`, both reasons and
/// `updated_at`.
pub fn status_attributes(credential: &Credential, now: Timestamp) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert("status".into(), json!(credential.status().as_str()));
    attributes.insert("suspension_reason".into(), json!(credential.suspension_reason()));
    attributes.insert("revocation_reason".into(), json!(credential.revocation_reason()));
    attributes.insert("updated_at".into(), json!(now.to_iso8601()));
    attributes
}

fn storage_key(credential: &Credential) -> StorageKey {
    StorageKey::credential(
        credential.issuing_country(),
        credential.credential_id(),
        credential.credential_type(),
    )
}

fn common_attributes(credential: &Credential, now: Timestamp) -> Attributes {
    let mut attributes = status_attributes(credential, now);
    attributes.insert(
        "credential_type".into(),
        json!(credential.credential_type().as_str()),
    );
    attributes.insert(
        "credential_id".into(),
        json!(credential.credential_id().as_str()),
    );
    attributes.insert(
        "issuing_country".into(),
        json!(credential.issuing_country().as_str()),
    );
    attributes.insert("valid_from".into(), json!(credential.valid_from().to_iso8601()));
    attributes.insert("valid_until".into(), json!(credential.valid_until().to_iso8601()));
    attributes.insert("created_at".into(), json!(now.to_iso8601()));
    attributes.insert("version".into(), Value::from(RECORD_VERSION));
    attributes
}

fn rehydrate(
    expected: CredentialType,
    record: &StorageRecord,
    details: CredentialDetails,
) -> Result<Credential, StorageError> {
    let stored_type = record.credential_type("credential_type")?;
    if stored_type != expected {
        return Err(StorageError::malformed(
            "credential_type",
            format!("expected {expected}, found {stored_type}"),
        ));
    }
    let persisted = PersistedCredential {
        credential_id: CredentialId::new(record.str("credential_id")?)
            .map_err(|e| StorageError::malformed("credential_id", e.to_string()))?,
        valid_from: record.timestamp("valid_from")?,
        valid_until: record.timestamp("valid_until")?,
        issuing_country: IssuingCountry::new(record.str("issuing_country")?)
            .map_err(|e| StorageError::malformed("issuing_country", e.to_string()))?,
        status: record.status("status")?,
        suspension_reason: record.opt_str("suspension_reason")?.map(str::to_string),
        revocation_reason: record.opt_str("revocation_reason")?.map(str::to_string),
        details,
    };
    Credential::rehydrate(persisted).map_err(|e| StorageError::malformed("credential", e.to_string()))
}

fn type_mismatch(expected: CredentialType, credential: &Credential) -> StorageError {
    StorageError::Serialization(format!(
        "{expected} mapper cannot store a {} credential",
        credential.credential_type()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cred_core::CredentialStatus;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse("t", s).unwrap()
    }

    fn license() -> Credential {
        Credential::new(
            CredentialId::new("D1234-56789").unwrap(),
            ts("2024-01-01T00:00:00Z"),
            ts("2029-12-31T00:00:00Z"),
            IssuingCountry::new("CA").unwrap(),
            CredentialDetails::DriversLicense(DriversLicense {
                vehicle_classes: vec!["A".into(), "B".into()],
                issuing_region: "ON".into(),
            }),
        )
        .unwrap()
    }

    fn passport() -> Credential {
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

    #[test]
    fn drivers_license_record_layout() {
        let now = ts("2025-03-01T10:00:00Z");
        let record = DriversLicenseMapper.to_storage(&license(), now).unwrap();
        assert_eq!(record.key.partition_key, "CRED#ca#D1234-56789");
        assert_eq!(record.key.sort_key, "METADATA#drivers_license");
        assert_eq!(record.str("issuing_country").unwrap(), "ca");
        assert_eq!(record.str("credential_type").unwrap(), "drivers_license");
        assert_eq!(record.str("status").unwrap(), "active");
        assert_eq!(record.str("valid_from").unwrap(), "2024-01-01T00:00:00Z");
        assert_eq!(record.str("created_at").unwrap(), "2025-03-01T10:00:00Z");
        assert_eq!(record.str("updated_at").unwrap(), "2025-03-01T10:00:00Z");
        assert_eq!(record.get("version"), Some(&json!(1)));
        assert_eq!(record.get("suspension_reason"), Some(&Value::Null));
        assert_eq!(record.str_list("vehicle_classes").unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn round_trip_keeps_lifecycle_state() {
        let mut credential = license();
        credential.suspend("audit").unwrap();
        let record = DriversLicenseMapper
            .to_storage(&credential, Timestamp::now())
            .unwrap();
        let restored = DriversLicenseMapper.to_domain(&record).unwrap();
        assert_eq!(restored, credential);
        assert_eq!(restored.status(), CredentialStatus::Suspended);
        assert_eq!(restored.suspension_reason(), Some("audit"));
    }

    #[test]
    fn passport_round_trip_revoked() {
        let mut credential = passport();
        credential.suspend("check").unwrap();
        credential.revoke("lost").unwrap();
        let record = PassportMapper.to_storage(&credential, Timestamp::now()).unwrap();
        assert_eq!(record.key.sort_key, "METADATA#passport");
        let restored = PassportMapper.to_domain(&record).unwrap();
        assert_eq!(restored, credential);
    }

    #[test]
    fn provider_dispatches_by_type() {
        let provider = MapperProvider;
        for t in CredentialType::ALL {
            assert_eq!(provider.mapper_for(t).credential_type(), t);
        }
    }

    #[test]
    fn wrong_mapper_is_rejected() {
        assert!(PassportMapper.to_storage(&license(), Timestamp::now()).is_err());
        let record = DriversLicenseMapper
            .to_storage(&license(), Timestamp::now())
            .unwrap();
        let err = PassportMapper.to_domain(&record).unwrap_err();
        assert!(matches!(err, StorageError::MalformedRecord { .. }));
    }

    #[test]
    fn unknown_stored_status_is_malformed() {
        let mut record = PassportMapper
            .to_storage(&passport(), Timestamp::now())
            .unwrap();
        record.attributes.insert("status".into(), json!("expired"));
        let err = PassportMapper.to_domain(&record).unwrap_err();
        assert!(matches!(err, StorageError::MalformedRecord { ref field, .. } if field == "status"));
    }

    #[test]
    fn status_attributes_are_partial() {
        let mut credential = license();
        credential.revoke("fraud").unwrap();
        let attrs = status_attributes(&credential, ts("2025-01-01T00:00:00Z"));
        let mut keys: Vec<_> = attrs.keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["revocation_reason", "status", "suspension_reason", "updated_at"]
        );
        assert_eq!(attrs["status"], json!("revoked"));
        assert_eq!(attrs["revocation_reason"], json!("fraud"));
    }
}
