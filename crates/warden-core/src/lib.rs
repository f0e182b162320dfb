//! # warden-core — Foundational Types for the SiteWarden Stack
//!
//! This crate is the bedrock of the SiteWarden Stack. It defines the
//! type-system primitives that make scoring decisions bit-reproducible and
//! audit records tamper-evident. Every other crate in the workspace depends
//! on `warden-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `ProjectId`, `SnapshotId`,
//!    `AnalysisId`, `ProofId`, `Bbl`, `TenantId` — no bare strings or UUIDs
//!    for identifiers.
//!
//! 2. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests.
//!    Ever. Sorted keys, compact separators, deterministic number
//!    formatting (RFC 8785).
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision — matching the canonicalization rules.
//!
//! 4. **`sha256_digest()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that all digest paths flow through canonicalization.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `warden-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, WardenError};
pub use identity::{AnalysisId, Bbl, ProjectId, ProofId, SnapshotId, TenantId};
pub use temporal::Timestamp;
