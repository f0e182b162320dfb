//! # Content Digest — Content-Addressed Identifiers
//!
//! Defines `ContentDigest` and `DigestAlgorithm` for the content-addressed
//! forensic archive and decision-proof sealing.
//!
//! ## Security Invariant
//!
//! A `ContentDigest` can only be computed from `CanonicalBytes`, ensuring
//! that every digest in the system is produced through the canonicalization
//! pipeline. This is enforced by the signature of `sha256_digest()`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// The hash algorithm used to produce a content digest.
///
/// SHA-256 is the only active algorithm. The tag exists so that archived
/// snapshots and sealed proofs remain self-describing if the convention
/// ever migrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256 — standard content addressing.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content-addressed digest with its algorithm tag.
///
/// Produced exclusively from `CanonicalBytes` via [`sha256_digest()`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new content digest from raw bytes and algorithm.
    ///
    /// Prefer [`sha256_digest()`] for constructing digests from
    /// `CanonicalBytes`.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Render the digest as a lowercase hex string (64 characters).
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// # Security Invariant
///
/// Accepts only `&CanonicalBytes`, not raw `&[u8]`. This compile-time
/// constraint prevents any code path from computing a digest over
/// non-canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Compute a SHA-256 lowercase hex string from canonical bytes.
///
/// Convenience wrapper around [`sha256_digest()`] for contexts that store
/// the digest as a 64-character hex string (snapshot `data_hash`, proof
/// `sha256_hash`).
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}
