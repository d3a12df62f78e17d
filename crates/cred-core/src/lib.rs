//! # cred-core: Foundational Types for the Credential Registry
//!
//! Defines the primitives every other crate in the workspace builds on.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `CredentialId` and
//!    `IssuingCountry` have validated constructors. A credential id can never
//!    contain the `#` delimiter used by composite storage keys, and an issuing
//!    country is always lowercase.
//!
//! 2. **Timezone-aware timestamps only.** [`Timestamp`] is UTC with seconds
//!    precision. Parsing rejects inputs that carry no offset instead of
//!    guessing one.
//!
//! 3. **Closed enums for wire strings.** [`CredentialType`],
//!    [`CredentialStatus`] and [`IssuerCategory`] parse from their lowercase
//!    wire form and fail with a [`ValidationError`] on anything else.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cred-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod credential_type;
pub mod digest;
pub mod error;
pub mod identity;
pub mod status;
pub mod temporal;

pub use credential_type::{CredentialType, IssuerCategory};
pub use digest::sha256_hex;
pub use error::ValidationError;
pub use identity::{CredentialId, IssuingCountry};
pub use status::CredentialStatus;
pub use temporal::Timestamp;
