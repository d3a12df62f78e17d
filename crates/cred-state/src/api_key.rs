//! # API Keys
//!
//! An API key authorizes credential writes. The plaintext is produced once,
//! at generation, and handed back to the operator; only its SHA-256 digest
//! is kept in the [`ApiKey`] record.

use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};

use cred_core::{sha256_hex, IssuerCategory, Timestamp};

/// Length of a generated key, in characters.
pub const API_KEY_LENGTH: usize = 32;

/// Stored API key record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    /// Lowercase hex SHA-256 of the plaintext key.
    pub key_digest: String,
    pub created_at: Timestamp,
    pub last_used: Option<Timestamp>,
    pub description: Option<String>,
    /// Category of the authority this key was issued to, if any.
    pub issuer_category: Option<IssuerCategory>,
}

/// A plaintext API key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeySecret(String);

impl ApiKeySecret {
    /// Wrap a plaintext key received from a caller.
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self(plaintext.into())
    }

    /// The plaintext value. Only for returning to the operator once.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Digest under which this key is stored.
    pub fn digest(&self) -> String {
        sha256_hex(&self.0)
    }
}

impl std::fmt::Debug for ApiKeySecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKeySecret([REDACTED])")
    }
}

/// Result of [`ApiKey::generate`]: the record to persist and the plaintext
/// to hand out.
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    pub api_key: ApiKey,
    pub secret: ApiKeySecret,
}

impl ApiKey {
    /// Generate a fresh key of [`API_KEY_LENGTH`] alphanumeric characters
    /// drawn from the OS random number generator.
    pub fn generate(
        description: Option<String>,
        issuer_category: Option<IssuerCategory>,
    ) -> GeneratedApiKey {
        let plaintext: String = OsRng
            .sample_iter(&Alphanumeric)
            .take(API_KEY_LENGTH)
            .map(char::from)
            .collect();
        let secret = ApiKeySecret(plaintext);
        GeneratedApiKey {
            api_key: ApiKey {
                key_digest: secret.digest(),
                created_at: Timestamp::now(),
                last_used: None,
                description,
                issuer_category,
            },
            secret,
        }
    }
}
