//! Storage keys and records.

use serde_json::{Map, Value};

use cred_core::{CredentialId, CredentialStatus, CredentialType, IssuingCountry, Timestamp};

use crate::error::StorageError;

/// Flat attribute map of a stored item.
pub type Attributes = Map<String, Value>;

/// Composite key addressing one stored item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey {
    pub partition_key: String,
    pub sort_key: String,
}

impl StorageKey {
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        }
    }

    /// `CRED#{issuing_country}#{credential_id}` / `METADATA#{type}`.
    pub fn credential(
        issuing_country: &IssuingCountry,
        credential_id: &CredentialId,
        credential_type: CredentialType,
    ) -> Self {
        Self::new(
            format!("CRED#{issuing_country}#{credential_id}"),
            format!("METADATA#{credential_type}"),
        )
    }

    /// `APIKEY#{digest}` / `METADATA`.
    pub fn api_key(key_digest: &str) -> Self {
        Self::new(format!("APIKEY#{key_digest}"), "METADATA")
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.partition_key, self.sort_key)
    }
}

/// One stored item: its key plus its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageRecord {
    pub key: StorageKey,
    pub attributes: Attributes,
}

impl StorageRecord {
    pub fn new(key: StorageKey, attributes: Attributes) -> Self {
        Self { key, attributes }
    }

    /// Raw attribute value, `None` when absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Required string attribute.
    pub fn str(&self, field: &str) -> Result<&str, StorageError> {
        match self.attributes.get(field) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(StorageError::malformed(
                field,
                format!("expected string, found {}", type_name(other)),
            )),
            None => Err(StorageError::malformed(field, "missing")),
        }
    }

    /// Optional string attribute. Absent and `null` both read as `None`.
    pub fn opt_str(&self, field: &str) -> Result<Option<&str>, StorageError> {
        match self.attributes.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(StorageError::malformed(
                field,
                format!("expected string or null, found {}", type_name(other)),
            )),
        }
    }

    /// Required list of strings.
    pub fn str_list(&self, field: &str) -> Result<Vec<String>, StorageError> {
        let Some(Value::Array(items)) = self.attributes.get(field) else {
            return Err(StorageError::malformed(field, "expected list of strings"));
        };
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| StorageError::malformed(field, "expected list of strings"))
            })
            .collect()
    }

    pub fn timestamp(&self, field: &str) -> Result<Timestamp, StorageError> {
        let raw = self.str(field)?;
        Timestamp::parse(field, raw).map_err(|e| StorageError::malformed(field, e.to_string()))
    }

    pub fn opt_timestamp(&self, field: &str) -> Result<Option<Timestamp>, StorageError> {
        self.opt_str(field)?
            .map(|raw| {
                Timestamp::parse(field, raw)
                    .map_err(|e| StorageError::malformed(field, e.to_string()))
            })
            .transpose()
    }

    pub fn status(&self, field: &str) -> Result<CredentialStatus, StorageError> {
        self.str(field)?
            .parse()
            .map_err(|e: cred_core::ValidationError| StorageError::malformed(field, e.to_string()))
    }

    pub fn credential_type(&self, field: &str) -> Result<CredentialType, StorageError> {
        self.str(field)?
            .parse()
            .map_err(|e: cred_core::ValidationError| StorageError::malformed(field, e.to_string()))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
