//! # Feature Snapshot — Normalized Scoring Inputs
//!
//! The exact set of inputs the risk engine scores. A `FeatureSnapshot` is
//! immutable once produced and is stored verbatim inside the resulting
//! `RiskAssessment`, so any assessment can be replayed and explained from
//! its own record alone.

use serde::{Deserialize, Serialize};

/// Normalized scoring inputs for one project.
///
/// Every field has a caller-supplied default (via `Default`), so partial
/// feature sets score without ceremony. Out-of-range values are clamped by
/// the component scorers rather than rejected here — scoring must always
/// be available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSnapshot {
    /// Open violation class tags (e.g., "Class C"). Highest class present
    /// drives the severity component.
    pub violation_classes: Vec<String>,
    /// Age of the governing permit in days.
    pub permit_age_days: u32,
    /// Failed inspections in the lookback window.
    pub inspection_failures: u32,
    /// Total inspections in the lookback window.
    pub inspection_total: u32,
    /// Days behind the declared milestone schedule. Negative means ahead.
    pub milestone_delay_days: i64,
    /// Complaints received in the trailing 90-day window.
    pub complaint_count_90d: u32,
    /// Prior stop-work orders on this site.
    pub prior_stop_work_orders: u32,
    /// Building type (free string, matched case-insensitively).
    pub building_type: String,
    /// Story count, at least 1.
    pub stories: u32,
    /// Contractor's historical violation rate in [0, 1].
    pub contractor_violation_rate: f64,
}

impl Default for FeatureSnapshot {
    fn default() -> Self {
        Self {
            violation_classes: Vec::new(),
            permit_age_days: 0,
            inspection_failures: 0,
            inspection_total: 0,
            milestone_delay_days: 0,
            complaint_count_90d: 0,
            prior_stop_work_orders: 0,
            building_type: "residential".to_string(),
            stories: 1,
            contractor_violation_rate: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot() {
        let f = FeatureSnapshot::default();
        assert!(f.violation_classes.is_empty());
        assert_eq!(f.building_type, "residential");
        assert_eq!(f.stories, 1);
        assert_eq!(f.contractor_violation_rate, 0.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let f = FeatureSnapshot {
            violation_classes: vec!["Class B".to_string()],
            permit_age_days: 400,
            ..Default::default()
        };
        let json = serde_json::to_string(&f).unwrap();
        let parsed: FeatureSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, f);
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let parsed: FeatureSnapshot =
            serde_json::from_str(r#"{"permit_age_days": 200}"#).unwrap();
        assert_eq!(parsed.permit_age_days, 200);
        assert_eq!(parsed.stories, 1);
        assert_eq!(parsed.building_type, "residential");
    }
}
