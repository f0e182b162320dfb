//! # Deterministic Risk Engine
//!
//! Composes the eight score components into a 0–100 risk score with derived
//! probabilities and fine exposure. The engine is pure: identical
//! `FeatureSnapshot` inputs always produce identical outputs, and every
//! assessment carries the snapshot it was scored from so the arithmetic can
//! be replayed and audited later.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::Timestamp;

use crate::components::{self, class_fine_amount};
use crate::features::FeatureSnapshot;

/// Sigmoid midpoint/steepness for the 30-day stop-work probability.
const STOP_WORK_MIDPOINT: f64 = 65.0;
/// Sigmoid midpoint for the insurance escalation probability.
const INSURANCE_MIDPOINT: f64 = 55.0;
/// Shared sigmoid steepness.
const SIGMOID_STEEPNESS: f64 = 0.15;
/// Fine multiplier applied to commercial buildings.
const COMMERCIAL_FINE_MULTIPLIER: f64 = 1.5;

/// The logistic transform mapping a bounded score to a probability.
///
/// `sigmoid(x, m, k) = 1 / (1 + e^(-k (x - m)))`.
pub fn sigmoid(x: f64, midpoint: f64, steepness: f64) -> f64 {
    1.0 / (1.0 + (-steepness * (x - midpoint)).exp())
}

/// One scored decision: the final score, derived probabilities, ranked
/// drivers, and the exact inputs that produced them.
///
/// # Invariant
///
/// `risk_score` is a deterministic, clamped, rounded function of
/// `features_snapshot` alone. [`RiskEngine::explain`] re-derives it and
/// fails loudly on any divergence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Final risk score in [0, 100].
    pub risk_score: u8,
    /// Probability of a stop-work order within 30 days, in [0, 1].
    pub stop_work_probability_30d: f64,
    /// Probability of insurance escalation, in [0, 1].
    pub insurance_escalation_probability: f64,
    /// Estimated fine exposure, non-negative.
    pub fine_exposure_estimate: f64,
    /// Contributing component names, descending by contribution.
    pub risk_drivers: Vec<String>,
    /// Engine version that produced this assessment.
    pub model_version: String,
    /// When the assessment was produced.
    pub scored_at: Timestamp,
    /// The exact inputs, stored verbatim for reproducibility.
    pub features_snapshot: FeatureSnapshot,
}

/// A recomputed component-by-component breakdown of an assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBreakdown {
    /// `(component name, value)` pairs in declaration order.
    pub components: Vec<(String, f64)>,
    /// The recomputed clamped rounded total.
    pub total: u8,
}

/// Errors raised by the risk engine.
#[derive(Error, Debug)]
pub enum RiskError {
    /// The recorded score does not match a recomputation from the stored
    /// snapshot. Either the record was mutated or the arithmetic changed
    /// under an unbumped model version.
    #[error("assessment inconsistent: recorded score {recorded}, recomputed {recomputed} (model {model_version})")]
    InconsistentAssessment {
        /// Score stored on the assessment.
        recorded: u8,
        /// Score recomputed from the stored snapshot.
        recomputed: u8,
        /// Model version stored on the assessment.
        model_version: String,
    },
}

/// The scoring seam consumed by forensic replay: any engine version that
/// can score a `FeatureSnapshot` can re-score archived inputs.
pub trait ScoringEngine {
    /// Score a feature snapshot into a risk assessment.
    fn score(&self, features: &FeatureSnapshot) -> RiskAssessment;
}

/// The deterministic multi-factor risk engine.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine;

impl RiskEngine {
    /// Version stamped onto every assessment. Bump on any change to the
    /// component arithmetic, tables, or canonicalization convention.
    pub const MODEL_VERSION: &'static str = "risk-engine/1.0.0";

    /// Create a risk engine.
    pub fn new() -> Self {
        Self
    }

    /// Score a feature snapshot.
    ///
    /// Infallible: out-of-range inputs are clamped by the component
    /// scorers, never rejected.
    pub fn score(&self, features: &FeatureSnapshot) -> RiskAssessment {
        let component_values = components::compute_all(features);
        let raw_total: f64 = component_values.iter().map(|(_, v)| v).sum();
        let risk_score = clamp_score(raw_total);
        let score_f = f64::from(risk_score);

        let mut ranked: Vec<(&'static str, f64)> = component_values
            .iter()
            .copied()
            .filter(|(_, v)| *v > 0.0)
            .collect();
        // Stable sort: declaration order breaks ties.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        RiskAssessment {
            risk_score,
            stop_work_probability_30d: sigmoid(score_f, STOP_WORK_MIDPOINT, SIGMOID_STEEPNESS),
            insurance_escalation_probability: sigmoid(
                score_f,
                INSURANCE_MIDPOINT,
                SIGMOID_STEEPNESS,
            ),
            fine_exposure_estimate: fine_exposure(features),
            risk_drivers: ranked.into_iter().map(|(n, _)| n.to_string()).collect(),
            model_version: Self::MODEL_VERSION.to_string(),
            scored_at: Timestamp::now(),
            features_snapshot: features.clone(),
        }
    }

    /// Recompute all eight component values from the stored snapshot and
    /// check that their clamped rounded sum equals the recorded total.
    ///
    /// This is the engine's self-consistency contract, required for
    /// forensic replay: an assessment must be explainable from its own
    /// record alone.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InconsistentAssessment`] when the recomputed
    /// total diverges from the recorded `risk_score`.
    pub fn explain(&self, assessment: &RiskAssessment) -> Result<RiskBreakdown, RiskError> {
        let component_values = components::compute_all(&assessment.features_snapshot);
        let raw_total: f64 = component_values.iter().map(|(_, v)| v).sum();
        let recomputed = clamp_score(raw_total);

        if recomputed != assessment.risk_score {
            return Err(RiskError::InconsistentAssessment {
                recorded: assessment.risk_score,
                recomputed,
                model_version: assessment.model_version.clone(),
            });
        }

        Ok(RiskBreakdown {
            components: component_values
                .iter()
                .map(|(n, v)| (n.to_string(), *v))
                .collect(),
            total: recomputed,
        })
    }
}

impl ScoringEngine for RiskEngine {
    fn score(&self, features: &FeatureSnapshot) -> RiskAssessment {
        RiskEngine::score(self, features)
    }
}

/// Round a raw component sum and clamp it to [0, 100].
fn clamp_score(raw_total: f64) -> u8 {
    raw_total.round().clamp(0.0, 100.0) as u8
}

/// Fine exposure: fixed per-class schedule summed over distinct present
/// classes, multiplied for commercial buildings.
fn fine_exposure(features: &FeatureSnapshot) -> f64 {
    let mut seen: Vec<String> = Vec::new();
    let mut total = 0.0;
    for class in &features.violation_classes {
        let key = class.trim().to_ascii_lowercase();
        if seen.contains(&key) {
            continue;
        }
        total += class_fine_amount(class);
        seen.push(key);
    }
    if features.building_type.trim().eq_ignore_ascii_case("commercial") {
        total *= COMMERCIAL_FINE_MULTIPLIER;
    }
    total
}
