//! # Audit Records
//!
//! The record types flowing through the audit pipeline: externally
//! produced findings and violations, the analysis under audit, inter-stage
//! messages, usage counters, and the sealed decision proof.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use warden_core::{AnalysisId, Bbl, ProofId, Timestamp};

/// Cost charged per image run through vision analysis.
pub const IMAGE_ANALYSIS_COST: f64 = 0.015;
/// Cost charged per violation document reviewed by the permit stage.
pub const DOCUMENT_REVIEW_COST: f64 = 0.002;

/// A finding produced by an external vision collaborator.
///
/// The producer is outside this core; findings arrive as opaque records
/// and only their confidence is adjusted here (by adversarial validation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Short finding name (e.g., "missing_guardrail").
    pub name: String,
    /// Free-text evidence notes from the producer.
    pub evidence_notes: String,
    /// Producer confidence in [0, 1].
    pub confidence: f64,
    /// Whether adversarial validation has processed this finding.
    pub validated: bool,
}

impl Finding {
    /// Create an unvalidated finding, clamping confidence into [0, 1].
    ///
    /// Out-of-range confidences are clamped rather than rejected, and the
    /// clamp is logged.
    pub fn new(name: impl Into<String>, evidence_notes: impl Into<String>, confidence: f64) -> Self {
        let clamped = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        if clamped != confidence {
            tracing::warn!(confidence, clamped, "finding confidence outside [0, 1], clamped");
        }
        Self {
            name: name.into(),
            evidence_notes: evidence_notes.into(),
            confidence: clamped,
            validated: false,
        }
    }
}

/// A violation record relayed from the permit data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DobViolation {
    /// Department violation number.
    pub violation_number: String,
    /// Violation type/class string.
    pub violation_type: String,
    /// Date the violation was issued.
    pub issue_date: NaiveDate,
}

/// The five fixed pipeline stage roles, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageRole {
    /// Image analysis intake.
    Vision,
    /// Permit/violation data relay.
    Permit,
    /// Merges permit-sourced violations into the analysis.
    Synthesis,
    /// Adversarial validation of findings.
    RedTeam,
    /// Final scoring and sealing.
    Risk,
}

impl StageRole {
    /// The five roles in pipeline order — the fixed agent chain carried
    /// by every sealed proof.
    pub const AGENT_CHAIN: [StageRole; 5] = [
        Self::Vision,
        Self::Permit,
        Self::Synthesis,
        Self::RedTeam,
        Self::Risk,
    ];

    /// The role's identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vision => "vision",
            Self::Permit => "permit",
            Self::Synthesis => "synthesis",
            Self::RedTeam => "red_team",
            Self::Risk => "risk",
        }
    }

    /// The agent chain as owned stage names.
    pub fn chain_names() -> [String; 5] {
        Self::AGENT_CHAIN.map(|r| r.as_str().to_string())
    }
}

impl std::fmt::Display for StageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit progress tag for an analysis moving through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    /// Submitted, nothing else has run.
    Created,
    /// Permit-sourced violations merged in.
    Synthesized,
    /// Findings adversarially validated.
    Validated,
    /// A decision proof has been sealed over this analysis.
    Sealed,
}

/// An entry in the append-only inter-stage message log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageMessage {
    /// Sending stage.
    pub from: StageRole,
    /// Receiving stage.
    pub to: StageRole,
    /// The site the message concerns.
    pub bbl: Bbl,
    /// The analysis the message references, when one exists yet.
    pub analysis_id: Option<AnalysisId>,
    /// Human-readable message body.
    pub content: String,
    /// Violations carried by permit relays; empty otherwise.
    pub violations: Vec<DobViolation>,
    /// When the message was appended.
    pub timestamp: Timestamp,
}

/// One site analysis under audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteAnalysis {
    /// Unique analysis identifier.
    pub analysis_id: AnalysisId,
    /// Site identifier.
    pub bbl: Bbl,
    /// Street address.
    pub address: String,
    /// Number of images the vision stage processed.
    pub images_processed: u32,
    /// Findings from the vision collaborator.
    pub findings: Vec<Finding>,
    /// Violations, including any merged in by synthesis.
    pub violations: Vec<DobViolation>,
    /// Compliance score supplied by the scoring layer.
    pub compliance_score: f64,
    /// Risk score supplied by the scoring layer.
    pub risk_score: f64,
    /// Explicit pipeline progress tag.
    pub phase: AnalysisPhase,
    /// When the analysis was submitted.
    pub created_at: Timestamp,
    /// Submission sequence within the owning pipeline state; breaks
    /// created_at ties when selecting the latest analysis for a site.
    pub sequence: u64,
}

/// Cumulative usage/cost counters for one pipeline instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageCounters {
    /// Images run through vision analysis.
    pub images_processed: u64,
    /// Accumulated image analysis cost.
    pub image_cost: f64,
    /// Violation documents reviewed.
    pub documents_processed: u64,
    /// Accumulated document review cost.
    pub document_cost: f64,
}

impl UsageCounters {
    /// Total accumulated cost.
    pub fn total_cost(&self) -> f64 {
        self.image_cost + self.document_cost
    }
}

/// An immutable, hash-sealed record attesting to one scoring decision.
///
/// All fields are private and set exactly once at sealing; no field may
/// change after construction. `sha256_hash` is the digest of the
/// canonical projection of the sealed analysis and is always a
/// 64-character lowercase hex string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionProofRecord {
    proof_id: ProofId,
    bbl: Bbl,
    analysis_id: AnalysisId,
    sha256_hash: String,
    agent_chain: [String; 5],
    compliance_score: f64,
    risk_score: f64,
    timestamp: Timestamp,
    summary: String,
}

impl DecisionProofRecord {
    /// Construct a sealed proof. Only the pipeline's sealing stage calls
    /// this; the record is read-only from then on.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn seal(
        bbl: Bbl,
        analysis_id: AnalysisId,
        sha256_hash: String,
        compliance_score: f64,
        risk_score: f64,
        timestamp: Timestamp,
        summary: String,
    ) -> Self {
        Self {
            proof_id: ProofId::new(),
            bbl,
            analysis_id,
            sha256_hash,
            agent_chain: StageRole::chain_names(),
            compliance_score,
            risk_score,
            timestamp,
            summary,
        }
    }

    /// Unique proof identifier.
    pub fn proof_id(&self) -> &ProofId {
        &self.proof_id
    }

    /// The site the decision concerns.
    pub fn bbl(&self) -> &Bbl {
        &self.bbl
    }

    /// The sealed analysis.
    pub fn analysis_id(&self) -> &AnalysisId {
        &self.analysis_id
    }

    /// 64-character lowercase hex digest of the canonical projection.
    pub fn sha256_hash(&self) -> &str {
        &self.sha256_hash
    }

    /// The fixed five-stage agent chain.
    pub fn agent_chain(&self) -> &[String; 5] {
        &self.agent_chain
    }

    /// Compliance score at sealing time.
    pub fn compliance_score(&self) -> f64 {
        self.compliance_score
    }

    /// Risk score at sealing time.
    pub fn risk_score(&self) -> f64 {
        self.risk_score
    }

    /// When the proof was sealed.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Human-readable decision summary.
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_clamps_confidence() {
        assert_eq!(Finding::new("f", "", 1.4).confidence, 1.0);
        assert_eq!(Finding::new("f", "", -0.2).confidence, 0.0);
        assert_eq!(Finding::new("f", "", f64::NAN).confidence, 0.0);
        assert_eq!(Finding::new("f", "", 0.8).confidence, 0.8);
        assert!(!Finding::new("f", "", 0.8).validated);
    }

    #[test]
    fn test_agent_chain_order() {
        let names = StageRole::chain_names();
        assert_eq!(names.len(), 5);
        assert_eq!(names[0], "vision");
        assert_eq!(names[2], "synthesis");
        assert_eq!(names[4], "risk");
    }

    #[test]
    fn test_phase_ordering() {
        assert!(AnalysisPhase::Created < AnalysisPhase::Synthesized);
        assert!(AnalysisPhase::Validated < AnalysisPhase::Sealed);
    }

    #[test]
    fn test_counters_total() {
        let counters = UsageCounters {
            images_processed: 10,
            image_cost: 0.15,
            documents_processed: 5,
            document_cost: 0.01,
        };
        assert!((counters.total_cost() - 0.16).abs() < 1e-12);
    }

    #[test]
    fn test_proof_serde_roundtrip() {
        let proof = DecisionProofRecord::seal(
            Bbl::new("1-1-1"),
            AnalysisId::new(),
            "a".repeat(64),
            62.0,
            78.0,
            Timestamp::parse("2026-04-01T00:00:00Z").unwrap(),
            "summary".to_string(),
        );
        let json = serde_json::to_string(&proof).unwrap();
        let parsed: DecisionProofRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.sha256_hash(), proof.sha256_hash());
        assert_eq!(parsed.agent_chain(), proof.agent_chain());
    }
}
