//! # cred-state: Credential Domain Model
//!
//! A credential is a single sum type: common fields (identifier, validity
//! window, issuing country, status and reasons) plus a [`CredentialDetails`]
//! payload carrying the variant-specific attributes. All lifecycle logic
//! operates on the common fields; variant logic is a `match` over the
//! payload.
//!
//! ## Status machine
//!
//! - **Credential** (`credential.rs`): `Active ⇄ Suspended`, both `→ Revoked`
//!   (terminal). Status is private; the only mutators are
//!   [`Credential::suspend`], [`Credential::revoke`], [`Credential::reinstate`]
//!   and the dispatching [`Credential::update_status`].
//!
//! ## Construction
//!
//! [`Credential::new`] always yields an `Active` credential with no reasons.
//! Persisted state is restored through [`Credential::rehydrate`], which takes
//! a [`PersistedCredential`] and applies its status and reasons in one step.
//! There is no public setter for status.
//!
//! ## Other domain records
//!
//! - **Issuer policy** (`policy.rs`): optional enforcement of which issuer
//!   category may create each credential type.
//! - **API key** (`api_key.rs`): generated keys, stored by digest only.

pub mod api_key;
pub mod credential;
pub mod error;
pub mod policy;

pub use api_key::{ApiKey, ApiKeySecret, GeneratedApiKey};
pub use credential::{Credential, CredentialDetails, DriversLicense, Passport, PersistedCredential};
pub use error::CredentialError;
pub use policy::IssuerPolicy;
