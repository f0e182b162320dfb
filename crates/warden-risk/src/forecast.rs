//! # Enforcement Forecaster
//!
//! Combines a risk score with the escalation graph into a forward-looking
//! enforcement forecast: the likely action set, 30/60-day stop-work
//! probabilities, a remediation checklist, and a response timeline.

use serde::{Deserialize, Serialize};

use crate::engine::sigmoid;
use crate::escalation::{
    is_highest_severity_class, likely_enforcement_actions, recommended_actions, EscalationLevel,
    ViolationTrack,
};

/// Probability boost when the highest-severity violation class is present.
const HIGHEST_SEVERITY_BOOST: f64 = 0.15;
/// Boost per prior stop-work order, and its cap.
const PRIOR_SWO_BOOST: f64 = 0.10;
const PRIOR_SWO_BOOST_CAP: f64 = 0.25;
/// Cap on the permit-age boost for permits older than a year.
const PERMIT_AGE_BOOST_CAP: f64 = 0.10;
/// 60-day probability scale over the 30-day figure.
const SIXTY_DAY_SCALE: f64 = 1.3;

/// A forward-looking enforcement forecast for one site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementForecast {
    /// Escalation tier derived from the risk score.
    pub escalation_level: EscalationLevel,
    /// Deduplicated, first-seen-ordered enforcement-category tags.
    pub likely_enforcement_actions: Vec<String>,
    /// Probability of a stop-work order within 30 days, in [0, 1].
    pub stop_work_probability_30d: f64,
    /// Probability of a stop-work order within 60 days, in [0, 1].
    pub stop_work_probability_60d: f64,
    /// Fixed remediation checklist for the escalation level.
    pub recommended_actions: Vec<String>,
    /// Days until enforcement response is expected.
    pub timeline_days: u32,
}

/// Forecast graduated enforcement escalation for a scored site.
///
/// `violation_classes` selects the enforcement track per class; an empty
/// list forecasts on the default track.
pub fn forecast_enforcement(
    risk_score: i64,
    violation_classes: &[String],
    prior_stop_work_orders: u32,
    permit_age_days: u32,
) -> EnforcementForecast {
    let level = EscalationLevel::from_score(risk_score);

    // Union the per-class action lists, deduplicating while preserving
    // first-seen order. No classes behaves like a single default-track one.
    let empty = [String::new()];
    let classes: &[String] = if violation_classes.is_empty() {
        &empty
    } else {
        violation_classes
    };
    let mut actions: Vec<String> = Vec::new();
    let mut seen_classes: Vec<&String> = Vec::new();
    for class in classes {
        if seen_classes.contains(&class) {
            continue;
        }
        seen_classes.push(class);
        let track = ViolationTrack::from_class(class);
        for action in likely_enforcement_actions(level, track) {
            if !actions.iter().any(|a| a == action) {
                actions.push((*action).to_string());
            }
        }
    }

    let mut p30 = sigmoid(risk_score as f64, 65.0, 0.15);
    if violation_classes.iter().any(|c| is_highest_severity_class(c)) {
        p30 += HIGHEST_SEVERITY_BOOST;
    }
    p30 += (f64::from(prior_stop_work_orders) * PRIOR_SWO_BOOST).min(PRIOR_SWO_BOOST_CAP);
    if permit_age_days > 365 {
        p30 += ((f64::from(permit_age_days) - 365.0) / 3_650.0).min(PERMIT_AGE_BOOST_CAP);
    }
    let p30 = p30.min(1.0);
    let p60 = (p30 * SIXTY_DAY_SCALE).min(1.0);

    let timeline_days = if risk_score >= 80 {
        7
    } else if risk_score >= 60 {
        30
    } else {
        90
    };

    EnforcementForecast {
        escalation_level: level,
        likely_enforcement_actions: actions,
        stop_work_probability_30d: p30,
        stop_work_probability_60d: p60,
        recommended_actions: recommended_actions(level)
            .iter()
            .map(|a| (*a).to_string())
            .collect(),
        timeline_days,
    }
}
