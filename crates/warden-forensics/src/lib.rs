//! # warden-forensics — Content-Addressed Ingestion Archive
//!
//! Archives every raw ingestion payload as an immutable, content-addressed
//! `ComplianceSnapshot`, and answers the forensic questions an enforcement
//! audit asks: point-in-time reconstruction, tamper detection, and
//! historical re-scoring under a caller-supplied engine.
//!
//! ## Architecture
//!
//! - **Snapshot** (`snapshot.rs`): the immutable archived record, sealed
//!   by the SHA-256 digest of its canonical encoding.
//! - **Store** (`store.rs`): the `SnapshotStore` get/put/list seam with an
//!   in-memory implementation; a persistent adapter would attach here.
//! - **Archive** (`archive.rs`): `ForensicsArchive` — archival, ordering,
//!   integrity verification, and replay through the `ScoringEngine` trait.
//!
//! ## Concurrency
//!
//! All operations are synchronous and perform no I/O. The archive is not
//! internally synchronized: concurrent callers mutating one instance must
//! provide their own mutual exclusion (one instance per tenant or request
//! scope is the intended model).

pub mod archive;
pub mod snapshot;
pub mod store;

pub use archive::{ForensicsArchive, ForensicsError};
pub use snapshot::ComplianceSnapshot;
pub use store::{InMemorySnapshotStore, SnapshotStore};
