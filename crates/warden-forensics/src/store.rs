//! # Snapshot Store — Storage Abstraction
//!
//! The archive sits behind a small get/put/list trait so the in-memory
//! map can be replaced by a persistent store without touching the
//! scoring or sealing logic. Only an in-memory implementation ships here;
//! persistence adapters are an external concern.

use std::collections::HashMap;

use warden_core::{ProjectId, SnapshotId};

use crate::snapshot::ComplianceSnapshot;

/// Storage seam for archived snapshots.
///
/// Implementations must preserve insertion order per project: when two
/// snapshots share a truncated-to-seconds timestamp, the later insertion
/// is the newer one.
pub trait SnapshotStore {
    /// Store a snapshot, indexed by its own id and by project.
    fn put(&mut self, snapshot: ComplianceSnapshot);

    /// Look up a snapshot by id.
    fn get(&self, id: &SnapshotId) -> Option<&ComplianceSnapshot>;

    /// Mutable lookup by id. Exists for persistence adapters that patch
    /// records in place; mutating `raw_payload` without recomputing the
    /// digest is exactly what integrity verification detects.
    fn get_mut(&mut self, id: &SnapshotId) -> Option<&mut ComplianceSnapshot>;

    /// All snapshots for a project, newest-first (timestamp descending,
    /// insertion order breaking ties).
    fn for_project(&self, project_id: &ProjectId) -> Vec<&ComplianceSnapshot>;

    /// Number of snapshots stored for a project.
    fn project_count(&self, project_id: &ProjectId) -> usize;
}

/// HashMap-backed snapshot store for single-process use.
///
/// Not internally synchronized: concurrent writers must provide their own
/// mutual exclusion.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    snapshots: HashMap<SnapshotId, ComplianceSnapshot>,
    // Insertion-ordered snapshot ids per project.
    by_project: HashMap<ProjectId, Vec<SnapshotId>>,
}

impl InMemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn put(&mut self, snapshot: ComplianceSnapshot) {
        self.by_project
            .entry(snapshot.project_id.clone())
            .or_default()
            .push(snapshot.snapshot_id.clone());
        self.snapshots.insert(snapshot.snapshot_id.clone(), snapshot);
    }

    fn get(&self, id: &SnapshotId) -> Option<&ComplianceSnapshot> {
        self.snapshots.get(id)
    }

    fn get_mut(&mut self, id: &SnapshotId) -> Option<&mut ComplianceSnapshot> {
        self.snapshots.get_mut(id)
    }

    fn for_project(&self, project_id: &ProjectId) -> Vec<&ComplianceSnapshot> {
        let ids = match self.by_project.get(project_id) {
            Some(ids) => ids,
            None => return Vec::new(),
        };
        let mut ordered: Vec<(usize, &ComplianceSnapshot)> = ids
            .iter()
            .enumerate()
            .filter_map(|(i, id)| self.snapshots.get(id).map(|s| (i, s)))
            .collect();
        // Newest first; insertion index breaks equal-second ties.
        ordered.sort_by(|(ia, a), (ib, b)| {
            b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia))
        });
        ordered.into_iter().map(|(_, s)| s).collect()
    }

    fn project_count(&self, project_id: &ProjectId) -> usize {
        self.by_project.get(project_id).map_or(0, Vec::len)
    }
}
