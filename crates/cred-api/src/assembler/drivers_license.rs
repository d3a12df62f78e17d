//! Drivers license assembler.

use serde_json::Value;

use cred_core::CredentialType;
use cred_state::{Credential, CredentialDetails, DriversLicense};

use super::{
    build_credential, common_to_dto, parse_payload, AssemblerError, CredentialAssembler,
};
use crate::dto::{CredentialDto, DriversLicenseDto};

#[derive(Debug, Clone, Copy, Default)]
pub struct DriversLicenseAssembler;

impl CredentialAssembler for DriversLicenseAssembler {
    fn credential_type(&self) -> CredentialType {
        CredentialType::DriversLicense
    }

    fn to_dto(&self, credential: &Credential) -> Result<CredentialDto, AssemblerError> {
        match credential.details() {
            CredentialDetails::DriversLicense(license) => {
                Ok(CredentialDto::DriversLicense(DriversLicenseDto {
                    common: common_to_dto(credential),
                    vehicle_classes: license.vehicle_classes.clone(),
                    issuing_region: license.issuing_region.clone(),
                }))
            }
            other => Err(AssemblerError::TypeMismatch {
                expected: CredentialType::DriversLicense,
                actual: other.credential_type(),
            }),
        }
    }

    fn to_domain(&self, payload: &Value) -> Result<Credential, AssemblerError> {
        let dto: DriversLicenseDto = parse_payload(payload)?;
        build_credential(
            &dto.common,
            CredentialDetails::DriversLicense(DriversLicense {
                vehicle_classes: dto.vehicle_classes,
                issuing_region: dto.issuing_region,
            }),
        )
    }
}
