//! # warden-audit — Multi-Stage Audit Pipeline
//!
//! A synchronous five-stage audit workflow for construction-site
//! compliance decisions. Sites are identified by their borough-block-lot
//! string ([`Bbl`](warden_core::Bbl)); each submitted [`SiteAnalysis`]
//! moves through fixed stage roles (Vision, Permit, Synthesis, RedTeam,
//! Risk) coordinated by [`AuditPipeline`], and ends as an immutable
//! [`DecisionProofRecord`] sealed under a SHA-256 digest of the
//! analysis's canonical projection.
//!
//! ```
//! use warden_audit::{AuditPipeline, Finding};
//! use warden_core::Bbl;
//!
//! let mut pipeline = AuditPipeline::lenient();
//! let proof = pipeline
//!     .run_full_pipeline(
//!         Bbl::new("1-00123-0045"),
//!         "1 Main St, Manhattan",
//!         3,
//!         vec![Finding::new("missing_guardrail", "east scaffold photo", 0.9)],
//!         vec![],
//!         62.0,
//!         78.0,
//!     )
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(proof.agent_chain().len(), 5);
//! ```

pub mod pipeline;
pub mod records;

pub use pipeline::{
    verify_proof, AuditPipeline, PipelineError, PipelineMode, SharedPipelineState,
    SiteComplianceReport, DEFAULT_FALSE_POSITIVE_REDUCTION,
};
pub use records::{
    AnalysisPhase, DecisionProofRecord, DobViolation, Finding, SiteAnalysis, StageMessage,
    StageRole, UsageCounters, DOCUMENT_REVIEW_COST, IMAGE_ANALYSIS_COST,
};
