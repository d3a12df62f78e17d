//! # Temporal Types: Timezone-Aware Timestamps
//!
//! Defines `Timestamp`, a UTC timestamp kept at the precision it was given.
//!
//! ## Invariant
//!
//! A credential's validity window is only meaningful when both ends name an
//! absolute instant. Inputs that carry no offset (`2024-01-01T00:00:00`,
//! `2024-01-01`) are **rejected** with [`ValidationError::MissingTimezone`];
//! there is no silent assumption of local time or UTC. Inputs with any
//! explicit offset (`Z`, `+00:00`, `-05:00`) are accepted and normalized
//! to UTC.
//!
//! The rendered form is `YYYY-MM-DDTHH:MM:SS[.fff]Z`, with a fractional part
//! only when the instant has one. Wire DTOs and storage records carry this
//! form, so rendering and parsing back is lossless.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Accepted layouts for offset-less inputs; used only to tell "missing
/// timezone" apart from "not a timestamp at all".
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A UTC timestamp.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`.
/// - [`Timestamp::parse()`]: from an RFC 3339 string carrying an offset.
///
/// Sub-second precision is never discarded, so ordering between two
/// timestamps inside the same second is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse an RFC 3339 / ISO-8601 timestamp that names `field` in errors.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingTimezone`] when the input is a valid
    ///   date or date-time without an offset.
    /// - [`ValidationError::InvalidTimestamp`] for anything else that is not
    ///   RFC 3339.
    pub fn parse(field: &str, s: &str) -> Result<Self, ValidationError> {
        match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => Ok(Self(dt.with_timezone(&Utc))),
            Err(_) if is_naive(s) => Err(ValidationError::MissingTimezone {
                field: field.to_string(),
            }),
            Err(e) => Err(ValidationError::InvalidTimestamp {
                field: field.to_string(),
                detail: e.to_string(),
            }),
        }
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as RFC 3339 with `Z` suffix (e.g. `2026-01-15T12:00:00Z`,
    /// `2026-01-15T12:00:00.250Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse("timestamp", &s).map_err(serde::de::Error::custom)
    }
}

fn is_naive(s: &str) -> bool {
    NAIVE_DATETIME_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
