//! # Error Types — Structured Error Hierarchy
//!
//! Defines the foundational error types of the SiteWarden Stack. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Canonicalization failures carry the offending condition.
//! - Validation errors name the violating input.
//! - Absence of a record is never an error at this layer — lookups return
//!   `Option` in the consuming crates.
//! - Workflow-specific failure modes live in the consuming crates'
//!   error enums, not here.

use thiserror::Error;

/// Foundational validation error for the SiteWarden Stack.
///
/// Consuming crates define their own error enums (`RiskError`,
/// `ForensicsError`, `PipelineError`); this type covers only the
/// validation failures produced in this crate, such as malformed
/// timestamps.
#[derive(Error, Debug)]
pub enum WardenError {
    /// Input validation failure.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// NaN and infinite floats have no JSON representation and therefore
    /// no canonical byte sequence.
    #[error("non-finite numbers cannot appear in canonical representations")]
    NonFiniteNumber,

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
