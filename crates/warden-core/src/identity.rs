//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all identifiers in the SiteWarden Stack. These
//! prevent accidental identifier confusion — you cannot pass a
//! `SnapshotId` where an `AnalysisId` is expected.
//!
//! Generated identifiers (`ProjectId`, `SnapshotId`, `AnalysisId`,
//! `ProofId`) are random UUIDs. Externally assigned identifiers (`Bbl`,
//! `TenantId`) wrap the string handed in by the ingestion layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a regulated construction project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub Uuid);

/// Unique identifier for an archived compliance snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub Uuid);

/// Unique identifier for a site analysis moving through the audit pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisId(pub Uuid);

/// Unique identifier for a sealed decision proof record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofId(pub Uuid);

/// Borough-Block-Lot site identifier — the aggregation key for analyses
/// and sealed proofs. Assigned by the city register, not generated here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bbl(pub String);

/// Tenant identifier for multi-tenant ingestion archives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

macro_rules! uuid_id_impl {
    ($ty:ident, $prefix:literal) => {
        impl $ty {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

uuid_id_impl!(ProjectId, "project");
uuid_id_impl!(SnapshotId, "snapshot");
uuid_id_impl!(AnalysisId, "analysis");
uuid_id_impl!(ProofId, "proof");

impl Bbl {
    /// Wrap an externally assigned BBL string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Access the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TenantId {
    /// Wrap an externally assigned tenant identifier.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Access the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Bbl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
