//! # Compliance Snapshot — Archived Ingestion Record
//!
//! A `ComplianceSnapshot` captures one raw ingestion payload at a point in
//! time, sealed by the content digest of its canonical encoding. Snapshots
//! are created by archival and never mutated; a snapshot's lifecycle ends
//! only by being superseded in ordering, never by deletion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use warden_core::{ProjectId, SnapshotId, TenantId, Timestamp};

/// An immutable archived ingestion record.
///
/// `data_hash` is the 64-character lowercase SHA-256 hex digest of the
/// canonical encoding of `raw_payload`. Any mutation of `raw_payload`
/// without recomputing the digest is detected by integrity verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceSnapshot {
    /// Unique snapshot identifier.
    pub snapshot_id: SnapshotId,
    /// The project this snapshot belongs to.
    pub project_id: ProjectId,
    /// Tenant that supplied the ingestion.
    pub tenant_id: TenantId,
    /// Ingestion source tag (e.g., "dob_api", "inspector_upload").
    pub source: String,
    /// When the snapshot was archived.
    pub timestamp: Timestamp,
    /// SHA-256 hex digest of the canonical encoding of `raw_payload`.
    pub data_hash: String,
    /// The enriched ingestion payload, stored verbatim.
    pub raw_payload: Value,
    /// Per-project monotonic version, starting at 1.
    pub version: u32,
}
