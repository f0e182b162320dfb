//! # Audit Pipeline — Five-Stage Sealing Workflow
//!
//! Coordinates the fixed stage roles (Vision, Permit, Synthesis, RedTeam,
//! Risk) over a shared state container, ending in an immutable,
//! hash-sealed [`DecisionProofRecord`].
//!
//! ## Stage Ordering
//!
//! Historically nothing prevented sealing an analysis that skipped
//! synthesis or validation. That permissive behavior is preserved as
//! [`PipelineMode::Lenient`] (the default, with a `tracing::warn!` audit
//! trail on out-of-order execution); [`PipelineMode::Strict`] rejects
//! out-of-order stage calls with [`PipelineError::OutOfOrder`]. Progress
//! is tracked as an explicit [`AnalysisPhase`] tag, never inferred from
//! data presence.
//!
//! ## Concurrency
//!
//! All operations are synchronous and single-threaded; the shared state
//! is not internally synchronized. One pipeline instance per tenant or
//! request scope is the intended model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::{
    sha256_hex, AnalysisId, Bbl, CanonicalBytes, CanonicalizationError, Timestamp,
};

use crate::records::{
    AnalysisPhase, DecisionProofRecord, DobViolation, Finding, SiteAnalysis, StageMessage,
    StageRole, UsageCounters, DOCUMENT_REVIEW_COST, IMAGE_ANALYSIS_COST,
};

/// Default confidence reduction applied by adversarial validation.
pub const DEFAULT_FALSE_POSITIVE_REDUCTION: f64 = 0.15;

/// Stage-ordering policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineMode {
    /// Stages operate on whatever data is present, in any order.
    /// Out-of-order execution is logged, not rejected.
    Lenient,
    /// Stages must run in order: Created → Synthesized → Validated →
    /// Sealed. Out-of-order calls are rejected.
    Strict,
}

impl Default for PipelineMode {
    fn default() -> Self {
        Self::Lenient
    }
}

/// Errors raised by the audit pipeline.
///
/// An unknown analysis id is NOT an error — stage operations return
/// `Ok(None)` so callers can treat "stage not yet reached" as a normal
/// condition.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A strict-mode stage ran out of order.
    #[error("stage {stage} rejected: analysis {analysis_id} is in phase {phase:?}, expected {expected:?}")]
    OutOfOrder {
        /// The stage that was invoked.
        stage: StageRole,
        /// The analysis involved.
        analysis_id: AnalysisId,
        /// The analysis's current phase.
        phase: AnalysisPhase,
        /// The phase the stage requires.
        expected: AnalysisPhase,
    },

    /// The sealing projection could not be canonicalized (non-finite
    /// score values).
    #[error("seal canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Process-wide shared container for one pipeline instance: analyses by
/// id, the append-only message log, usage counters, and sealed proofs.
///
/// Only [`AuditPipeline`] mutates this; read access is provided for the
/// consuming web/UI layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedPipelineState {
    analyses: HashMap<AnalysisId, SiteAnalysis>,
    messages: Vec<StageMessage>,
    counters: UsageCounters,
    proofs: Vec<DecisionProofRecord>,
    next_sequence: u64,
}

impl SharedPipelineState {
    /// Create an empty state container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an analysis by id.
    pub fn analysis(&self, id: &AnalysisId) -> Option<&SiteAnalysis> {
        self.analyses.get(id)
    }

    /// The append-only inter-stage message log.
    pub fn messages(&self) -> &[StageMessage] {
        &self.messages
    }

    /// Cumulative usage/cost counters.
    pub fn counters(&self) -> &UsageCounters {
        &self.counters
    }

    /// All sealed decision proofs, in sealing order.
    pub fn proofs(&self) -> &[DecisionProofRecord] {
        &self.proofs
    }
}

/// Aggregated compliance view of one site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SiteComplianceReport {
    /// No analyses exist for the site.
    NoData {
        /// The site queried.
        bbl: Bbl,
    },
    /// At least one analysis exists.
    Aggregated {
        /// The site queried.
        bbl: Bbl,
        /// Number of analyses submitted for the site.
        analyses_count: usize,
        /// Number of sealed proofs for the site.
        sealed_proofs_count: usize,
        /// Compliance score of the latest analysis.
        latest_compliance_score: f64,
        /// Risk score of the latest analysis.
        latest_risk_score: f64,
        /// Cost accumulated for this site's images and documents.
        accumulated_cost: f64,
    },
}

/// The five-stage audit pipeline over a [`SharedPipelineState`].
#[derive(Debug, Clone, Default)]
pub struct AuditPipeline {
    state: SharedPipelineState,
    mode: PipelineMode,
}

impl AuditPipeline {
    /// Create a pipeline with the given stage-ordering policy.
    pub fn new(mode: PipelineMode) -> Self {
        Self {
            state: SharedPipelineState::new(),
            mode,
        }
    }

    /// Create a lenient pipeline (the historical permissive behavior).
    pub fn lenient() -> Self {
        Self::new(PipelineMode::Lenient)
    }

    /// Create a strict pipeline that rejects out-of-order stages.
    pub fn strict() -> Self {
        Self::new(PipelineMode::Strict)
    }

    /// Read access to the shared state.
    pub fn state(&self) -> &SharedPipelineState {
        &self.state
    }

    // ── Stage 1: Vision ──────────────────────────────────────────────

    /// Create and store an analysis record, charge image costs, and
    /// announce it to synthesis.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_site_analysis(
        &mut self,
        bbl: Bbl,
        address: impl Into<String>,
        images_processed: u32,
        findings: Vec<Finding>,
        violations: Vec<DobViolation>,
        compliance_score: f64,
        risk_score: f64,
    ) -> SiteAnalysis {
        let analysis = SiteAnalysis {
            analysis_id: AnalysisId::new(),
            bbl: bbl.clone(),
            address: address.into(),
            images_processed,
            findings,
            violations,
            compliance_score,
            risk_score,
            phase: AnalysisPhase::Created,
            created_at: Timestamp::now(),
            sequence: self.state.next_sequence,
        };
        self.state.next_sequence += 1;

        self.state.counters.images_processed += u64::from(images_processed);
        self.state.counters.image_cost += f64::from(images_processed) * IMAGE_ANALYSIS_COST;

        self.push_message(
            StageRole::Vision,
            StageRole::Synthesis,
            bbl,
            Some(analysis.analysis_id.clone()),
            format!("site analysis {} submitted", analysis.analysis_id),
            Vec::new(),
        );
        self.state
            .analyses
            .insert(analysis.analysis_id.clone(), analysis.clone());
        analysis
    }

    // ── Stage 2: Permit ──────────────────────────────────────────────

    /// Relay permit-sourced violations toward synthesis and charge
    /// document costs.
    pub fn relay_violations(&mut self, bbl: Bbl, violations: Vec<DobViolation>) {
        let count = violations.len();
        self.state.counters.documents_processed += count as u64;
        self.state.counters.document_cost += count as f64 * DOCUMENT_REVIEW_COST;
        self.push_message(
            StageRole::Permit,
            StageRole::Synthesis,
            bbl,
            None,
            format!("{count} violation records relayed"),
            violations,
        );
    }

    // ── Stage 3: Synthesis ───────────────────────────────────────────

    /// Merge permit-relayed violations addressed to the analysis's site
    /// into its violation list, skipping exact duplicates.
    ///
    /// Returns `Ok(None)` when no analysis exists with the given id.
    pub fn synthesize(
        &mut self,
        analysis_id: &AnalysisId,
    ) -> Result<Option<SiteAnalysis>, PipelineError> {
        let Some(analysis) = self.state.analyses.get(analysis_id) else {
            return Ok(None);
        };
        check_phase(self.mode, StageRole::Synthesis, analysis, AnalysisPhase::Created)?;

        let bbl = analysis.bbl.clone();
        let relayed: Vec<DobViolation> = self
            .state
            .messages
            .iter()
            .filter(|m| {
                m.from == StageRole::Permit && m.to == StageRole::Synthesis && m.bbl == bbl
            })
            .flat_map(|m| m.violations.iter().cloned())
            .collect();

        let merged = {
            // Field-level borrow: messages were read above, analyses is
            // mutated here.
            let analysis = match self.state.analyses.get_mut(analysis_id) {
                Some(a) => a,
                None => return Ok(None),
            };
            for violation in relayed {
                if !analysis.violations.contains(&violation) {
                    analysis.violations.push(violation);
                }
            }
            advance_phase(analysis, AnalysisPhase::Synthesized);
            analysis.clone()
        };

        self.push_message(
            StageRole::Synthesis,
            StageRole::RedTeam,
            bbl,
            Some(analysis_id.clone()),
            format!("analysis synthesized with {} violations", merged.violations.len()),
            Vec::new(),
        );
        Ok(Some(merged))
    }

    // ── Stage 4: RedTeam ─────────────────────────────────────────────

    /// Adversarially validate findings: scale every finding's confidence
    /// by `(1 - false_positive_rate_reduction)` and mark it validated.
    ///
    /// Returns `Ok(None)` when no analysis exists with the given id.
    pub fn red_team_validate(
        &mut self,
        analysis_id: &AnalysisId,
        false_positive_rate_reduction: f64,
    ) -> Result<Option<SiteAnalysis>, PipelineError> {
        let Some(analysis) = self.state.analyses.get(analysis_id) else {
            return Ok(None);
        };
        check_phase(self.mode, StageRole::RedTeam, analysis, AnalysisPhase::Synthesized)?;

        let reduction = if false_positive_rate_reduction.is_nan() {
            DEFAULT_FALSE_POSITIVE_REDUCTION
        } else {
            false_positive_rate_reduction.clamp(0.0, 1.0)
        };
        if reduction != false_positive_rate_reduction {
            tracing::warn!(
                false_positive_rate_reduction,
                reduction,
                "false positive reduction outside [0, 1], adjusted"
            );
        }

        let (bbl, validated) = {
            let analysis = match self.state.analyses.get_mut(analysis_id) {
                Some(a) => a,
                None => return Ok(None),
            };
            for finding in &mut analysis.findings {
                finding.confidence *= 1.0 - reduction;
                finding.validated = true;
            }
            advance_phase(analysis, AnalysisPhase::Validated);
            (analysis.bbl.clone(), analysis.clone())
        };

        self.push_message(
            StageRole::RedTeam,
            StageRole::Risk,
            bbl,
            Some(analysis_id.clone()),
            format!("{} findings validated", validated.findings.len()),
            Vec::new(),
        );
        Ok(Some(validated))
    }

    // ── Stage 5: Risk ────────────────────────────────────────────────

    /// Seal the analysis under a content digest of its canonical
    /// projection, producing an immutable [`DecisionProofRecord`].
    ///
    /// Returns `Ok(None)` when no analysis exists with the given id.
    pub fn score_and_seal(
        &mut self,
        analysis_id: &AnalysisId,
    ) -> Result<Option<DecisionProofRecord>, PipelineError> {
        let Some(analysis) = self.state.analyses.get(analysis_id) else {
            return Ok(None);
        };
        check_phase(self.mode, StageRole::Risk, analysis, AnalysisPhase::Validated)?;

        let sealed_at = Timestamp::now();
        let hash = seal_hash(analysis, sealed_at)?;
        let summary = format!(
            "Site {}: {} findings, {} violations, compliance {:.1}, risk {:.1}",
            analysis.bbl,
            analysis.findings.len(),
            analysis.violations.len(),
            analysis.compliance_score,
            analysis.risk_score,
        );
        let proof = DecisionProofRecord::seal(
            analysis.bbl.clone(),
            analysis_id.clone(),
            hash,
            analysis.compliance_score,
            analysis.risk_score,
            sealed_at,
            summary,
        );

        if let Some(analysis) = self.state.analyses.get_mut(analysis_id) {
            advance_phase(analysis, AnalysisPhase::Sealed);
        }
        self.state.proofs.push(proof.clone());
        tracing::debug!(
            analysis_id = %analysis_id,
            proof_id = %proof.proof_id(),
            "decision proof sealed"
        );
        Ok(Some(proof))
    }

    // ── Orchestration ────────────────────────────────────────────────

    /// Run all five stages in sequence, synchronously, short-circuiting
    /// to `Ok(None)` at the first stage that cannot find its analysis.
    #[allow(clippy::too_many_arguments)]
    pub fn run_full_pipeline(
        &mut self,
        bbl: Bbl,
        address: impl Into<String>,
        images_processed: u32,
        findings: Vec<Finding>,
        dob_violations: Vec<DobViolation>,
        compliance_score: f64,
        risk_score: f64,
    ) -> Result<Option<DecisionProofRecord>, PipelineError> {
        let analysis = self.submit_site_analysis(
            bbl.clone(),
            address,
            images_processed,
            findings,
            Vec::new(),
            compliance_score,
            risk_score,
        );
        self.relay_violations(bbl, dob_violations);
        if self.synthesize(&analysis.analysis_id)?.is_none() {
            return Ok(None);
        }
        if self
            .red_team_validate(&analysis.analysis_id, DEFAULT_FALSE_POSITIVE_REDUCTION)?
            .is_none()
        {
            return Ok(None);
        }
        self.score_and_seal(&analysis.analysis_id)
    }

    /// Aggregate all analyses and proofs for a site.
    pub fn get_site_compliance(&self, bbl: &Bbl) -> SiteComplianceReport {
        let site_analyses: Vec<&SiteAnalysis> = self
            .state
            .analyses
            .values()
            .filter(|a| &a.bbl == bbl)
            .collect();
        if site_analyses.is_empty() {
            return SiteComplianceReport::NoData { bbl: bbl.clone() };
        }

        // Latest by submission time; sequence breaks equal-second ties.
        let latest = site_analyses
            .iter()
            .max_by_key(|a| (a.created_at, a.sequence))
            .copied();
        let (latest_compliance_score, latest_risk_score) = match latest {
            Some(a) => (a.compliance_score, a.risk_score),
            None => (0.0, 0.0),
        };

        let image_cost: f64 = site_analyses
            .iter()
            .map(|a| f64::from(a.images_processed) * IMAGE_ANALYSIS_COST)
            .sum();
        let document_cost: f64 = self
            .state
            .messages
            .iter()
            .filter(|m| m.from == StageRole::Permit && &m.bbl == bbl)
            .map(|m| m.violations.len() as f64 * DOCUMENT_REVIEW_COST)
            .sum();

        SiteComplianceReport::Aggregated {
            bbl: bbl.clone(),
            analyses_count: site_analyses.len(),
            sealed_proofs_count: self.state.proofs.iter().filter(|p| p.bbl() == bbl).count(),
            latest_compliance_score,
            latest_risk_score,
            accumulated_cost: image_cost + document_cost,
        }
    }

    fn push_message(
        &mut self,
        from: StageRole,
        to: StageRole,
        bbl: Bbl,
        analysis_id: Option<AnalysisId>,
        content: String,
        violations: Vec<DobViolation>,
    ) {
        tracing::debug!(%from, %to, %bbl, "pipeline stage message");
        self.state.messages.push(StageMessage {
            from,
            to,
            bbl,
            analysis_id,
            content,
            violations,
            timestamp: Timestamp::now(),
        });
    }
}

/// Recompute a proof's projection hash from an analysis and compare.
///
/// This is the forensic verification path: a proof verifies only against
/// the exact analysis contents it sealed. A projection that no longer
/// canonicalizes also fails verification.
pub fn verify_proof(proof: &DecisionProofRecord, analysis: &SiteAnalysis) -> bool {
    match seal_hash(analysis, proof.timestamp()) {
        Ok(hash) => hash == proof.sha256_hash(),
        Err(_) => false,
    }
}

/// The fixed canonical projection sealed into every decision proof.
///
/// A typed struct, not a `serde_json::Value`: building a `Value` would
/// collapse a NaN score to `null` before canonicalization could reject it.
#[derive(Serialize)]
struct SealProjection<'a> {
    analysis_id: String,
    bbl: &'a str,
    images_processed: u32,
    compliance_score: f64,
    risk_score: f64,
    findings_count: usize,
    violations_count: usize,
    timestamp: String,
}

fn seal_hash(analysis: &SiteAnalysis, sealed_at: Timestamp) -> Result<String, CanonicalizationError> {
    let projection = SealProjection {
        analysis_id: analysis.analysis_id.to_string(),
        bbl: analysis.bbl.as_str(),
        images_processed: analysis.images_processed,
        compliance_score: analysis.compliance_score,
        risk_score: analysis.risk_score,
        findings_count: analysis.findings.len(),
        violations_count: analysis.violations.len(),
        timestamp: sealed_at.to_iso8601(),
    };
    Ok(sha256_hex(&CanonicalBytes::new(&projection)?))
}

/// Strict mode rejects a stage unless the analysis is in the expected
/// phase; lenient mode logs and proceeds.
fn check_phase(
    mode: PipelineMode,
    stage: StageRole,
    analysis: &SiteAnalysis,
    expected: AnalysisPhase,
) -> Result<(), PipelineError> {
    if analysis.phase == expected {
        return Ok(());
    }
    match mode {
        PipelineMode::Strict => Err(PipelineError::OutOfOrder {
            stage,
            analysis_id: analysis.analysis_id.clone(),
            phase: analysis.phase,
            expected,
        }),
        PipelineMode::Lenient => {
            tracing::warn!(
                %stage,
                analysis_id = %analysis.analysis_id,
                phase = ?analysis.phase,
                expected = ?expected,
                "stage executed out of order (lenient mode)"
            );
            Ok(())
        }
    }
}

/// Phases only advance; a lenient out-of-order earlier stage never
/// regresses progress.
fn advance_phase(analysis: &mut SiteAnalysis, phase: AnalysisPhase) {
    if phase > analysis.phase {
        analysis.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bbl() -> Bbl {
        Bbl::new("1-00123-0045")
    }

    fn finding(name: &str, confidence: f64) -> Finding {
        Finding::new(name, "photo evidence", confidence)
    }

    fn violation(number: &str) -> DobViolation {
        DobViolation {
            violation_number: number.to_string(),
            violation_type: "Class B".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        }
    }

    fn findings3() -> Vec<Finding> {
        vec![finding("missing_guardrail", 0.9), finding("debris_netting", 0.7), finding("site_fence_gap", 0.5)]
    }

    // ── submit / relay ───────────────────────────────────────────────

    #[test]
    fn test_submit_charges_image_costs_and_messages_synthesis() {
        let mut pipeline = AuditPipeline::lenient();
        let analysis =
            pipeline.submit_site_analysis(bbl(), "1 Main St", 4, findings3(), vec![], 70.0, 40.0);
        assert_eq!(analysis.phase, AnalysisPhase::Created);
        assert_eq!(pipeline.state().counters().images_processed, 4);
        assert!((pipeline.state().counters().image_cost - 4.0 * IMAGE_ANALYSIS_COST).abs() < 1e-12);

        let msg = &pipeline.state().messages()[0];
        assert_eq!(msg.from, StageRole::Vision);
        assert_eq!(msg.to, StageRole::Synthesis);
        assert_eq!(msg.analysis_id.as_ref(), Some(&analysis.analysis_id));
    }

    #[test]
    fn test_relay_charges_document_costs() {
        let mut pipeline = AuditPipeline::lenient();
        pipeline.relay_violations(bbl(), vec![violation("V1"), violation("V2")]);
        assert_eq!(pipeline.state().counters().documents_processed, 2);
        let msg = &pipeline.state().messages()[0];
        assert_eq!(msg.from, StageRole::Permit);
        assert_eq!(msg.violations.len(), 2);
    }

    // ── synthesize ───────────────────────────────────────────────────

    #[test]
    fn test_synthesize_merges_relayed_violations_skipping_duplicates() {
        let mut pipeline = AuditPipeline::lenient();
        let analysis = pipeline.submit_site_analysis(
            bbl(),
            "1 Main St",
            0,
            vec![],
            vec![violation("V1")],
            70.0,
            40.0,
        );
        pipeline.relay_violations(bbl(), vec![violation("V1"), violation("V2")]);

        let merged = pipeline.synthesize(&analysis.analysis_id).unwrap().unwrap();
        let numbers: Vec<&str> =
            merged.violations.iter().map(|v| v.violation_number.as_str()).collect();
        assert_eq!(numbers, vec!["V1", "V2"]);
        assert_eq!(merged.phase, AnalysisPhase::Synthesized);
    }

    #[test]
    fn test_synthesize_ignores_other_sites() {
        let mut pipeline = AuditPipeline::lenient();
        let analysis =
            pipeline.submit_site_analysis(bbl(), "1 Main St", 0, vec![], vec![], 70.0, 40.0);
        pipeline.relay_violations(Bbl::new("2-999-1"), vec![violation("V9")]);
        let merged = pipeline.synthesize(&analysis.analysis_id).unwrap().unwrap();
        assert!(merged.violations.is_empty());
    }

    #[test]
    fn test_unknown_analysis_is_none_not_error() {
        let mut pipeline = AuditPipeline::lenient();
        assert!(pipeline.synthesize(&AnalysisId::new()).unwrap().is_none());
        assert!(pipeline.red_team_validate(&AnalysisId::new(), 0.15).unwrap().is_none());
        assert!(pipeline.score_and_seal(&AnalysisId::new()).unwrap().is_none());
    }

    // ── red team ─────────────────────────────────────────────────────

    #[test]
    fn test_red_team_scales_confidence_and_marks_validated() {
        let mut pipeline = AuditPipeline::lenient();
        let analysis =
            pipeline.submit_site_analysis(bbl(), "1 Main St", 0, findings3(), vec![], 70.0, 40.0);
        pipeline.synthesize(&analysis.analysis_id).unwrap();
        let validated =
            pipeline.red_team_validate(&analysis.analysis_id, 0.15).unwrap().unwrap();
        assert!((validated.findings[0].confidence - 0.9 * 0.85).abs() < 1e-12);
        assert!(validated.findings.iter().all(|f| f.validated));
        assert_eq!(validated.phase, AnalysisPhase::Validated);
    }

    // ── seal ─────────────────────────────────────────────────────────

    #[test]
    fn test_seal_produces_verifiable_proof() {
        let mut pipeline = AuditPipeline::lenient();
        let analysis =
            pipeline.submit_site_analysis(bbl(), "1 Main St", 2, findings3(), vec![], 62.0, 78.0);
        pipeline.synthesize(&analysis.analysis_id).unwrap();
        pipeline.red_team_validate(&analysis.analysis_id, 0.15).unwrap();
        let proof = pipeline.score_and_seal(&analysis.analysis_id).unwrap().unwrap();

        assert_eq!(proof.sha256_hash().len(), 64);
        assert!(proof.sha256_hash().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(proof.agent_chain().len(), 5);
        assert_eq!(proof.compliance_score(), 62.0);

        let sealed = pipeline.state().analysis(&analysis.analysis_id).unwrap();
        assert_eq!(sealed.phase, AnalysisPhase::Sealed);
        assert!(verify_proof(&proof, sealed));
    }

    #[test]
    fn test_seal_rejects_non_finite_score() {
        let mut pipeline = AuditPipeline::lenient();
        let analysis =
            pipeline.submit_site_analysis(bbl(), "1 Main St", 0, vec![], vec![], f64::NAN, 78.0);
        let err = pipeline.score_and_seal(&analysis.analysis_id).unwrap_err();
        assert!(matches!(err, PipelineError::Canonicalization(_)));
        assert!(pipeline.state().proofs().is_empty());
    }

    #[test]
    fn test_verify_proof_fails_after_mutation() {
        let mut pipeline = AuditPipeline::lenient();
        let analysis =
            pipeline.submit_site_analysis(bbl(), "1 Main St", 2, findings3(), vec![], 62.0, 78.0);
        let proof = pipeline.score_and_seal(&analysis.analysis_id).unwrap().unwrap();

        let mut tampered = pipeline.state().analysis(&analysis.analysis_id).unwrap().clone();
        tampered.compliance_score = 99.9;
        assert!(!verify_proof(&proof, &tampered));
    }

    #[test]
    fn test_summary_mentions_counts_and_scores() {
        let mut pipeline = AuditPipeline::lenient();
        let analysis = pipeline.submit_site_analysis(
            bbl(),
            "1 Main St",
            0,
            findings3(),
            vec![violation("V1")],
            62.0,
            78.0,
        );
        let proof = pipeline.score_and_seal(&analysis.analysis_id).unwrap().unwrap();
        assert!(proof.summary().contains("3 findings"));
        assert!(proof.summary().contains("1 violations"));
        assert!(proof.summary().contains("62.0"));
    }

    // ── ordering policy ──────────────────────────────────────────────

    #[test]
    fn test_lenient_allows_sealing_without_synthesis() {
        let mut pipeline = AuditPipeline::lenient();
        let analysis =
            pipeline.submit_site_analysis(bbl(), "1 Main St", 0, vec![], vec![], 50.0, 50.0);
        let proof = pipeline.score_and_seal(&analysis.analysis_id).unwrap();
        assert!(proof.is_some());
    }

    #[test]
    fn test_strict_rejects_sealing_without_validation() {
        let mut pipeline = AuditPipeline::strict();
        let analysis =
            pipeline.submit_site_analysis(bbl(), "1 Main St", 0, vec![], vec![], 50.0, 50.0);
        let err = pipeline.score_and_seal(&analysis.analysis_id).unwrap_err();
        match err {
            PipelineError::OutOfOrder { stage, phase, expected, .. } => {
                assert_eq!(stage, StageRole::Risk);
                assert_eq!(phase, AnalysisPhase::Created);
                assert_eq!(expected, AnalysisPhase::Validated);
            }
            other => panic!("expected OutOfOrder, got: {other:?}"),
        }
    }

    #[test]
    fn test_strict_rejects_double_synthesis() {
        let mut pipeline = AuditPipeline::strict();
        let analysis =
            pipeline.submit_site_analysis(bbl(), "1 Main St", 0, vec![], vec![], 50.0, 50.0);
        pipeline.synthesize(&analysis.analysis_id).unwrap();
        assert!(pipeline.synthesize(&analysis.analysis_id).is_err());
    }

    #[test]
    fn test_strict_in_order_run_succeeds() {
        let mut pipeline = AuditPipeline::strict();
        let proof = pipeline
            .run_full_pipeline(bbl(), "1 Main St", 1, findings3(), vec![violation("V1")], 62.0, 78.0)
            .unwrap();
        assert!(proof.is_some());
    }

    // ── full pipeline ────────────────────────────────────────────────

    #[test]
    fn test_run_full_pipeline_seals_proof() {
        let mut pipeline = AuditPipeline::lenient();
        let proof = pipeline
            .run_full_pipeline(
                Bbl::new("X"),
                "1 Main St",
                3,
                findings3(),
                vec![violation("V1")],
                62.0,
                78.0,
            )
            .unwrap()
            .expect("pipeline should seal a proof");

        assert_eq!(proof.sha256_hash().len(), 64);
        assert!(proof.sha256_hash().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(proof.agent_chain().len(), 5);
        assert_eq!(proof.compliance_score(), 62.0);

        // The relayed violation was merged during synthesis.
        let sealed = pipeline.state().analysis(proof.analysis_id()).unwrap();
        assert_eq!(sealed.violations.len(), 1);
        assert_eq!(sealed.phase, AnalysisPhase::Sealed);
    }

    // ── site aggregation ─────────────────────────────────────────────

    #[test]
    fn test_get_site_compliance_no_data() {
        let pipeline = AuditPipeline::lenient();
        match pipeline.get_site_compliance(&bbl()) {
            SiteComplianceReport::NoData { bbl: reported } => assert_eq!(reported, bbl()),
            other => panic!("expected NoData, got: {other:?}"),
        }
    }

    #[test]
    fn test_get_site_compliance_aggregates() {
        let mut pipeline = AuditPipeline::lenient();
        pipeline
            .run_full_pipeline(bbl(), "1 Main St", 2, findings3(), vec![violation("V1")], 62.0, 78.0)
            .unwrap();
        pipeline.submit_site_analysis(bbl(), "1 Main St", 1, vec![], vec![], 80.0, 30.0);
        // Another site's activity must not leak into this aggregation.
        pipeline.submit_site_analysis(Bbl::new("9-9-9"), "other", 5, vec![], vec![], 10.0, 90.0);

        match pipeline.get_site_compliance(&bbl()) {
            SiteComplianceReport::Aggregated {
                analyses_count,
                sealed_proofs_count,
                latest_compliance_score,
                latest_risk_score,
                accumulated_cost,
                ..
            } => {
                assert_eq!(analyses_count, 2);
                assert_eq!(sealed_proofs_count, 1);
                assert_eq!(latest_compliance_score, 80.0);
                assert_eq!(latest_risk_score, 30.0);
                let expected = 3.0 * IMAGE_ANALYSIS_COST + DOCUMENT_REVIEW_COST;
                assert!((accumulated_cost - expected).abs() < 1e-12);
            }
            other => panic!("expected Aggregated, got: {other:?}"),
        }
    }
}
