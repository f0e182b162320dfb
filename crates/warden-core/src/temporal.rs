//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision, rendered as ISO8601 with a `Z` suffix.
//!
//! ## Security Invariant
//!
//! Timestamps feeding digest computation must be UTC with Z suffix for
//! deterministic canonicalization. Local timezone offsets would produce
//! different canonical byte sequences for the same instant, breaking both
//! snapshot integrity verification and decision-proof re-verification.
//! Non-UTC inputs are rejected by the strict parser rather than silently
//! converted.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WardenError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an ISO8601 string, rejecting non-UTC offsets.
/// - [`Timestamp::parse_lenient()`] — converts any offset to UTC, for
///   ingesting external data outside digest paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 / ISO8601 string.
    ///
    /// **Rejects non-UTC inputs.** Only the `Z` suffix is accepted; explicit
    /// offsets are rejected even when semantically equivalent (`+00:00`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid RFC 3339 or uses a
    /// non-Z timezone offset.
    pub fn parse(s: &str) -> Result<Self, WardenError> {
        if !s.ends_with('Z') {
            return Err(WardenError::Validation(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }

        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            WardenError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;

        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Parse an RFC 3339 string, accepting any timezone offset and
    /// converting to UTC.
    ///
    /// For digest computation paths prefer [`Timestamp::parse()`], which
    /// rejects non-UTC inputs.
    pub fn parse_lenient(s: &str) -> Result<Self, WardenError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            WardenError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, WardenError> {
        let dt = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| WardenError::Validation(format!("invalid Unix timestamp: {secs}")))?;
        Ok(Self(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
