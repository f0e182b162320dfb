//! # Forensics Archive — Content-Addressed Ingestion History
//!
//! Archives raw ingestion payloads as content-addressed snapshots and
//! answers the three forensic questions: what did we know at time T
//! (`reconstruct_state_at`), has the record been tampered with
//! (`verify_integrity`), and what would a different engine version have
//! scored (`replay_risk_score`).
//!
//! ## Security Invariant
//!
//! Every stored digest is computed over `CanonicalBytes` of the stored
//! payload, so verification at any later point recomputes the exact same
//! byte sequence. A payload mutated without recomputing the digest — or
//! mutated into something that no longer canonicalizes — verifies false.

use serde_json::json;
use thiserror::Error;

use warden_core::{
    sha256_hex, CanonicalBytes, CanonicalizationError, ProjectId, SnapshotId, TenantId, Timestamp,
};
use warden_risk::{RiskAssessment, ScoringEngine};

use crate::snapshot::ComplianceSnapshot;
use crate::store::{InMemorySnapshotStore, SnapshotStore};

/// Errors raised by the forensics archive.
#[derive(Error, Debug)]
pub enum ForensicsError {
    /// The payload could not be canonicalized for digest computation.
    #[error("archival canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// No snapshot exists with the given id.
    #[error("unknown snapshot: {snapshot_id}")]
    UnknownSnapshot {
        /// The id that was looked up.
        snapshot_id: SnapshotId,
    },

    /// The archived payload does not deserialize into scoring features.
    #[error("archived payload is not a feature snapshot: {0}")]
    PayloadShape(String),
}

/// Content-addressed archive of raw ingestion payloads.
///
/// Generic over [`SnapshotStore`] so a persistent backend can replace the
/// in-memory map without touching archival or verification logic. Not
/// internally synchronized; see the crate docs.
#[derive(Debug, Clone, Default)]
pub struct ForensicsArchive<S: SnapshotStore> {
    store: S,
}

impl ForensicsArchive<InMemorySnapshotStore> {
    /// Create an archive backed by the in-memory store.
    pub fn in_memory() -> Self {
        Self {
            store: InMemorySnapshotStore::new(),
        }
    }
}

impl<S: SnapshotStore> ForensicsArchive<S> {
    /// Create an archive over an existing store.
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Archive a raw ingestion payload as a new immutable snapshot.
    ///
    /// The payload is enriched with its source and tenant tags, canonically
    /// encoded, and sealed under the SHA-256 hex digest of that encoding.
    /// The snapshot is indexed both by its own id and by project; its
    /// version is the project's prior snapshot count plus one.
    pub fn archive_ingestion(
        &mut self,
        project_id: &ProjectId,
        source: &str,
        raw_payload: serde_json::Value,
        tenant_id: &TenantId,
    ) -> Result<ComplianceSnapshot, ForensicsError> {
        self.archive_ingestion_at(project_id, source, raw_payload, tenant_id, Timestamp::now())
    }

    /// Archive with an explicit timestamp.
    ///
    /// Used for backfilling historical ingestions; `archive_ingestion` is
    /// the normal path.
    pub fn archive_ingestion_at(
        &mut self,
        project_id: &ProjectId,
        source: &str,
        raw_payload: serde_json::Value,
        tenant_id: &TenantId,
        timestamp: Timestamp,
    ) -> Result<ComplianceSnapshot, ForensicsError> {
        let enriched = json!({
            "payload": raw_payload,
            "source": source,
            "tenant_id": tenant_id.as_str(),
        });
        let canonical = CanonicalBytes::new(&enriched)?;
        let data_hash = sha256_hex(&canonical);

        let snapshot = ComplianceSnapshot {
            snapshot_id: SnapshotId::new(),
            project_id: project_id.clone(),
            tenant_id: tenant_id.clone(),
            source: source.to_string(),
            timestamp,
            data_hash,
            raw_payload: enriched,
            version: u32::try_from(self.store.project_count(project_id)).unwrap_or(u32::MAX - 1)
                + 1,
        };
        tracing::debug!(
            snapshot_id = %snapshot.snapshot_id,
            project_id = %project_id,
            version = snapshot.version,
            "archived ingestion snapshot"
        );
        self.store.put(snapshot.clone());
        Ok(snapshot)
    }

    /// All snapshots for a project, newest-first by timestamp.
    pub fn get_project_snapshots(&self, project_id: &ProjectId) -> Vec<&ComplianceSnapshot> {
        self.store.for_project(project_id)
    }

    /// The newest snapshot with timestamp at or before `at_time`, if any.
    pub fn reconstruct_state_at(
        &self,
        project_id: &ProjectId,
        at_time: Timestamp,
    ) -> Option<&ComplianceSnapshot> {
        self.store
            .for_project(project_id)
            .into_iter()
            .find(|s| s.timestamp <= at_time)
    }

    /// Recompute the digest over the stored payload and compare it to the
    /// stored digest.
    ///
    /// `None` for an unknown id. `Some(false)` signals tampering or
    /// corruption — including a payload mutated into something that no
    /// longer canonicalizes — and is for the caller to act on, never
    /// silently ignored.
    pub fn verify_integrity(&self, snapshot_id: &SnapshotId) -> Option<bool> {
        let snapshot = self.store.get(snapshot_id)?;
        match CanonicalBytes::new(&snapshot.raw_payload) {
            Ok(canonical) => Some(sha256_hex(&canonical) == snapshot.data_hash),
            Err(e) => {
                tracing::warn!(
                    snapshot_id = %snapshot_id,
                    error = %e,
                    "stored payload no longer canonicalizes; treating as integrity failure"
                );
                Some(false)
            }
        }
    }

    /// Re-score an archived feature payload under a caller-supplied engine.
    ///
    /// Enables re-scoring of historical inputs under a different engine
    /// version while the original inputs remain verifiably unchanged. The
    /// archived payload's `payload` field must deserialize into a
    /// `FeatureSnapshot`.
    pub fn replay_risk_score(
        &self,
        snapshot_id: &SnapshotId,
        engine: &dyn ScoringEngine,
    ) -> Result<RiskAssessment, ForensicsError> {
        let snapshot = self
            .store
            .get(snapshot_id)
            .ok_or_else(|| ForensicsError::UnknownSnapshot {
                snapshot_id: snapshot_id.clone(),
            })?;
        let payload = snapshot
            .raw_payload
            .get("payload")
            .cloned()
            .ok_or_else(|| ForensicsError::PayloadShape("missing payload field".to_string()))?;
        let features = serde_json::from_value(payload)
            .map_err(|e| ForensicsError::PayloadShape(e.to_string()))?;
        Ok(engine.score(&features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use warden_risk::{FeatureSnapshot, RiskEngine};

    fn archive() -> ForensicsArchive<InMemorySnapshotStore> {
        ForensicsArchive::in_memory()
    }

    fn tenant() -> TenantId {
        TenantId::new("tenant-a")
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    // ── archive_ingestion ────────────────────────────────────────────

    #[test]
    fn test_archive_produces_hex_digest() {
        let mut archive = archive();
        let project = ProjectId::new();
        let snap = archive
            .archive_ingestion(&project, "dob_api", json!({"complaints": 3}), &tenant())
            .unwrap();
        assert_eq!(snap.data_hash.len(), 64);
        assert!(snap.data_hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(snap.version, 1);
        assert_eq!(snap.raw_payload["source"], "dob_api");
        assert_eq!(snap.raw_payload["tenant_id"], "tenant-a");
    }

    #[test]
    fn test_versions_increment_per_project() {
        let mut archive = archive();
        let p1 = ProjectId::new();
        let p2 = ProjectId::new();
        let a = archive.archive_ingestion(&p1, "s", json!({}), &tenant()).unwrap();
        let b = archive.archive_ingestion(&p1, "s", json!({}), &tenant()).unwrap();
        let c = archive.archive_ingestion(&p2, "s", json!({}), &tenant()).unwrap();
        assert_eq!(a.version, 1);
        assert_eq!(b.version, 2);
        assert_eq!(c.version, 1);
    }

    #[test]
    fn test_identical_payloads_identical_hashes() {
        let mut archive = archive();
        let project = ProjectId::new();
        let a = archive
            .archive_ingestion(&project, "s", json!({"b": 2, "a": 1}), &tenant())
            .unwrap();
        let b = archive
            .archive_ingestion(&project, "s", json!({"a": 1, "b": 2}), &tenant())
            .unwrap();
        // Key order does not matter under canonical encoding.
        assert_eq!(a.data_hash, b.data_hash);
        assert_ne!(a.snapshot_id, b.snapshot_id);
    }

    // ── ordering and reconstruction ──────────────────────────────────

    #[test]
    fn test_get_project_snapshots_newest_first() {
        let mut archive = archive();
        let project = ProjectId::new();
        for (i, day) in ["01", "03", "02"].iter().enumerate() {
            archive
                .archive_ingestion_at(
                    &project,
                    "s",
                    json!({"n": i}),
                    &tenant(),
                    ts(&format!("2026-02-{day}T00:00:00Z")),
                )
                .unwrap();
        }
        let snaps = archive.get_project_snapshots(&project);
        let days: Vec<String> = snaps.iter().map(|s| s.timestamp.to_iso8601()).collect();
        assert_eq!(
            days,
            vec![
                "2026-02-03T00:00:00Z".to_string(),
                "2026-02-02T00:00:00Z".to_string(),
                "2026-02-01T00:00:00Z".to_string(),
            ]
        );
    }

    #[test]
    fn test_reconstruct_state_at() {
        let mut archive = archive();
        let project = ProjectId::new();
        let first = archive
            .archive_ingestion_at(&project, "s", json!({"n": 1}), &tenant(), ts("2026-02-01T00:00:00Z"))
            .unwrap();
        let second = archive
            .archive_ingestion_at(&project, "s", json!({"n": 2}), &tenant(), ts("2026-02-10T00:00:00Z"))
            .unwrap();

        // Between the two snapshots: the first is the state of record.
        let mid = archive.reconstruct_state_at(&project, ts("2026-02-05T00:00:00Z")).unwrap();
        assert_eq!(mid.snapshot_id, first.snapshot_id);

        // After both: the second.
        let late = archive.reconstruct_state_at(&project, ts("2026-03-01T00:00:00Z")).unwrap();
        assert_eq!(late.snapshot_id, second.snapshot_id);

        // Exactly at a snapshot's timestamp: inclusive.
        let exact = archive.reconstruct_state_at(&project, ts("2026-02-01T00:00:00Z")).unwrap();
        assert_eq!(exact.snapshot_id, first.snapshot_id);

        // Before every snapshot: none.
        assert!(archive.reconstruct_state_at(&project, ts("2026-01-01T00:00:00Z")).is_none());
    }

    // ── integrity ────────────────────────────────────────────────────

    #[test]
    fn test_verify_integrity_after_archive() {
        let mut archive = archive();
        let project = ProjectId::new();
        let snap = archive
            .archive_ingestion(&project, "s", json!({"complaints": 3}), &tenant())
            .unwrap();
        assert_eq!(archive.verify_integrity(&snap.snapshot_id), Some(true));
    }

    #[test]
    fn test_verify_integrity_detects_tampering() {
        let mut archive = archive();
        let project = ProjectId::new();
        let snap = archive
            .archive_ingestion(&project, "s", json!({"complaints": 3}), &tenant())
            .unwrap();

        let stored = archive.store_mut().get_mut(&snap.snapshot_id).unwrap();
        stored.raw_payload["payload"]["complaints"] = json!(0);

        assert_eq!(archive.verify_integrity(&snap.snapshot_id), Some(false));
    }

    #[test]
    fn test_verify_integrity_unknown_id() {
        assert_eq!(archive().verify_integrity(&SnapshotId::new()), None);
    }

    // ── replay ───────────────────────────────────────────────────────

    #[test]
    fn test_replay_risk_score() {
        let mut archive = archive();
        let project = ProjectId::new();
        let features = FeatureSnapshot {
            violation_classes: vec!["Class C".to_string()],
            permit_age_days: 900,
            ..Default::default()
        };
        let snap = archive
            .archive_ingestion(&project, "scoring", serde_json::to_value(&features).unwrap(), &tenant())
            .unwrap();

        let engine = RiskEngine::new();
        let replayed = archive.replay_risk_score(&snap.snapshot_id, &engine).unwrap();
        assert_eq!(replayed.risk_score, engine.score(&features).risk_score);
        // Original inputs remain verifiably unchanged.
        assert_eq!(archive.verify_integrity(&snap.snapshot_id), Some(true));
    }

    #[test]
    fn test_replay_unknown_snapshot_errors() {
        let archive = archive();
        let err = archive
            .replay_risk_score(&SnapshotId::new(), &RiskEngine::new())
            .unwrap_err();
        assert!(matches!(err, ForensicsError::UnknownSnapshot { .. }));
    }

    #[test]
    fn test_replay_malformed_payload_errors() {
        let mut archive = archive();
        let project = ProjectId::new();
        let snap = archive
            .archive_ingestion(&project, "s", json!("not a feature map"), &tenant())
            .unwrap();
        let err = archive
            .replay_risk_score(&snap.snapshot_id, &RiskEngine::new())
            .unwrap_err();
        assert!(matches!(err, ForensicsError::PayloadShape(_)));
    }
}
