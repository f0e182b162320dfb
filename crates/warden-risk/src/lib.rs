//! # warden-risk — Deterministic Risk Engine and Enforcement Forecasting
//!
//! Computes reproducible 0–100 risk scores for regulated construction
//! projects from normalized feature inputs, and forecasts graduated
//! enforcement escalation from those scores.
//!
//! ## Architecture
//!
//! - **Features** (`features.rs`): the immutable `FeatureSnapshot` input
//!   record, stored verbatim inside every assessment.
//!
//! - **Components** (`components.rs`): eight independent pure functions,
//!   each mapping one feature to a bounded partial score.
//!
//! - **Engine** (`engine.rs`): composes the components into a
//!   `RiskAssessment` with sigmoid-derived probabilities and fine
//!   exposure; `explain` re-derives every component from the stored
//!   snapshot as a self-consistency check. `ScoringEngine` is the trait
//!   seam used by forensic replay.
//!
//! - **Escalation** (`escalation.rs`): static score-band and
//!   enforcement-action tables — immutable constants, no hidden
//!   singletons.
//!
//! - **Forecast** (`forecast.rs`): `forecast_enforcement` combines the
//!   score, violation classes, and enforcement history into an
//!   `EnforcementForecast`.
//!
//! ## Crate Policy
//!
//! - Scoring is infallible: out-of-range inputs clamp (with a `tracing`
//!   warning), never reject. Callers needing strict validation must
//!   validate before scoring.
//! - Identical inputs produce identical outputs. No randomness, no
//!   ambient state; `scored_at` is the only non-derived field.

pub mod components;
pub mod engine;
pub mod escalation;
pub mod features;
pub mod forecast;

pub use engine::{sigmoid, RiskAssessment, RiskBreakdown, RiskEngine, RiskError, ScoringEngine};
pub use escalation::{
    likely_enforcement_actions, recommended_actions, EscalationLevel, ViolationTrack,
};
pub use features::FeatureSnapshot;
pub use forecast::{forecast_enforcement, EnforcementForecast};
