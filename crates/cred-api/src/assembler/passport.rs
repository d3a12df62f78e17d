//! Passport assembler.

use serde_json::Value;

use cred_core::CredentialType;
use cred_state::{Credential, CredentialDetails, Passport};

use super::{
    build_credential, common_to_dto, parse_payload, AssemblerError, CredentialAssembler,
};
use crate::dto::{CredentialDto, PassportDto};

#[derive(Debug, Clone, Copy, Default)]
pub struct PassportAssembler;

impl CredentialAssembler for PassportAssembler {
    fn credential_type(&self) -> CredentialType {
        CredentialType::Passport
    }

    fn to_dto(&self, credential: &Credential) -> Result<CredentialDto, AssemblerError> {
        match credential.details() {
            CredentialDetails::Passport(passport) => Ok(CredentialDto::Passport(PassportDto {
                common: common_to_dto(credential),
                nationality: passport.nationality.clone(),
            })),
            other => Err(AssemblerError::TypeMismatch {
                expected: CredentialType::Passport,
                actual: other.credential_type(),
            }),
        }
    }

    fn to_domain(&self, payload: &Value) -> Result<Credential, AssemblerError> {
        let dto: PassportDto = parse_payload(payload)?;
        build_credential(
            &dto.common,
            CredentialDetails::Passport(Passport {
                nationality: dto.nationality,
            }),
        )
    }
}
