//! # Score Components — Eight Pure Bounded Functions
//!
//! Each component maps one feature of a [`FeatureSnapshot`] to a bounded
//! partial score. The components are independent, side-effect-free, and
//! deterministic; the engine's `explain` contract depends on being able to
//! recompute every one of them from a stored snapshot.
//!
//! Component order in [`COMPONENT_NAMES`] is the declaration order used to
//! break ties when ranking risk drivers.

use crate::features::FeatureSnapshot;

/// Component names in declaration order.
pub const COMPONENT_NAMES: [&str; 8] = [
    "violation_severity",
    "permit_age",
    "inspection_failure",
    "schedule_delay",
    "complaint_velocity",
    "enforcement_history",
    "building_risk",
    "contractor_risk",
];

/// Severity points for the highest violation class (cap of the
/// `violation_severity` component).
pub const MAX_SEVERITY_POINTS: f64 = 30.0;

/// Points contributed by a single violation class tag.
///
/// Class C (immediately hazardous) dominates; unknown tags score zero.
pub fn class_severity_points(class: &str) -> f64 {
    match class.trim().to_ascii_lowercase().as_str() {
        "class c" => 30.0,
        "class b" => 20.0,
        "class a" => 10.0,
        _ => 0.0,
    }
}

/// Base fine amount for a single violation class tag.
pub fn class_fine_amount(class: &str) -> f64 {
    match class.trim().to_ascii_lowercase().as_str() {
        "class c" => 2_500.0,
        "class b" => 1_250.0,
        "class a" => 625.0,
        _ => 0.0,
    }
}

/// Violation severity (0–30): the highest class present wins.
pub fn violation_severity(features: &FeatureSnapshot) -> f64 {
    features
        .violation_classes
        .iter()
        .map(|c| class_severity_points(c))
        .fold(0.0, f64::max)
}

/// Permit age (0–15): 0 below 180 days, 15 at/above 720 days, linear ramp
/// between.
pub fn permit_age(features: &FeatureSnapshot) -> f64 {
    let days = f64::from(features.permit_age_days);
    if days < 180.0 {
        0.0
    } else if days >= 720.0 {
        15.0
    } else {
        (days - 180.0) / (720.0 - 180.0) * 15.0
    }
}

/// Inspection failure (0–15): failure ratio capped at 1.0, scaled to 15.
/// Zero when no inspections have occurred.
pub fn inspection_failure(features: &FeatureSnapshot) -> f64 {
    if features.inspection_total == 0 {
        return 0.0;
    }
    let ratio = f64::from(features.inspection_failures) / f64::from(features.inspection_total);
    ratio.min(1.0) * 15.0
}

/// Schedule delay (0–10): 0 at/below 0 days, 10 at/above 90 days, linear
/// ramp between.
pub fn schedule_delay(features: &FeatureSnapshot) -> f64 {
    let days = features.milestone_delay_days;
    if days <= 0 {
        0.0
    } else if days >= 90 {
        10.0
    } else {
        days as f64 / 90.0 * 10.0
    }
}

/// Complaint velocity (0–10): 2 points per complaint in the trailing
/// 90-day window, capped at 10.
pub fn complaint_velocity(features: &FeatureSnapshot) -> f64 {
    (f64::from(features.complaint_count_90d) * 2.0).min(10.0)
}

/// Enforcement history (0–10): 5 points per prior stop-work order,
/// capped at 10.
pub fn enforcement_history(features: &FeatureSnapshot) -> f64 {
    (f64::from(features.prior_stop_work_orders) * 5.0).min(10.0)
}

/// Building risk (0–5): type base factor scaled to 3 points plus a height
/// factor (stories / 40, capped at 1.0) scaled to 2 points.
pub fn building_risk(features: &FeatureSnapshot) -> f64 {
    let height_factor = (f64::from(features.stories) / 40.0).min(1.0);
    building_type_factor(&features.building_type) * 3.0 + height_factor * 2.0
}

/// Contractor risk (0–5): violation rate clamped to [0, 1], scaled to 5.
///
/// Out-of-range rates are clamped rather than rejected; the clamp is
/// logged so upstream validation gaps stay visible.
pub fn contractor_risk(features: &FeatureSnapshot) -> f64 {
    let rate = features.contractor_violation_rate;
    let clamped = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
    if clamped != rate {
        tracing::warn!(rate, clamped, "contractor_violation_rate outside [0, 1], clamped");
    }
    clamped * 5.0
}

/// Base risk factor for a building type. Unknown types take the mid value.
fn building_type_factor(building_type: &str) -> f64 {
    match building_type.trim().to_ascii_lowercase().as_str() {
        "residential" => 0.5,
        "mixed_use" | "mixed use" => 0.6,
        "commercial" => 0.8,
        "industrial" => 0.9,
        _ => 0.6,
    }
}

/// Compute all eight components in declaration order.
pub fn compute_all(features: &FeatureSnapshot) -> [(&'static str, f64); 8] {
    [
        (COMPONENT_NAMES[0], violation_severity(features)),
        (COMPONENT_NAMES[1], permit_age(features)),
        (COMPONENT_NAMES[2], inspection_failure(features)),
        (COMPONENT_NAMES[3], schedule_delay(features)),
        (COMPONENT_NAMES[4], complaint_velocity(features)),
        (COMPONENT_NAMES[5], enforcement_history(features)),
        (COMPONENT_NAMES[6], building_risk(features)),
        (COMPONENT_NAMES[7], contractor_risk(features)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(f: impl FnOnce(&mut FeatureSnapshot)) -> FeatureSnapshot {
        let mut features = FeatureSnapshot::default();
        f(&mut features);
        features
    }

    // ── violation_severity ───────────────────────────────────────────

    #[test]
    fn test_severity_highest_class_wins() {
        let f = with(|f| {
            f.violation_classes =
                vec!["Class A".into(), "Class C".into(), "Class B".into()];
        });
        assert_eq!(violation_severity(&f), 30.0);
    }

    #[test]
    fn test_severity_case_insensitive() {
        let f = with(|f| f.violation_classes = vec!["class b".into()]);
        assert_eq!(violation_severity(&f), 20.0);
    }

    #[test]
    fn test_severity_empty_and_unknown() {
        assert_eq!(violation_severity(&FeatureSnapshot::default()), 0.0);
        let f = with(|f| f.violation_classes = vec!["Class Z".into()]);
        assert_eq!(violation_severity(&f), 0.0);
    }

    // ── permit_age ───────────────────────────────────────────────────

    #[test]
    fn test_permit_age_ramp() {
        assert_eq!(permit_age(&with(|f| f.permit_age_days = 0)), 0.0);
        assert_eq!(permit_age(&with(|f| f.permit_age_days = 179)), 0.0);
        assert_eq!(permit_age(&with(|f| f.permit_age_days = 720)), 15.0);
        assert_eq!(permit_age(&with(|f| f.permit_age_days = 900)), 15.0);
        // Midpoint of the ramp: 450 days.
        let mid = permit_age(&with(|f| f.permit_age_days = 450));
        assert!((mid - 7.5).abs() < 1e-9);
    }

    // ── inspection_failure ───────────────────────────────────────────

    #[test]
    fn test_inspection_failure_ratio() {
        let f = with(|f| {
            f.inspection_failures = 5;
            f.inspection_total = 10;
        });
        assert_eq!(inspection_failure(&f), 7.5);
    }

    #[test]
    fn test_inspection_failure_zero_total() {
        let f = with(|f| f.inspection_failures = 3);
        assert_eq!(inspection_failure(&f), 0.0);
    }

    #[test]
    fn test_inspection_failure_ratio_capped() {
        let f = with(|f| {
            f.inspection_failures = 20;
            f.inspection_total = 10;
        });
        assert_eq!(inspection_failure(&f), 15.0);
    }

    // ── schedule_delay ───────────────────────────────────────────────

    #[test]
    fn test_schedule_delay_bounds() {
        assert_eq!(schedule_delay(&with(|f| f.milestone_delay_days = -10)), 0.0);
        assert_eq!(schedule_delay(&with(|f| f.milestone_delay_days = 0)), 0.0);
        assert_eq!(schedule_delay(&with(|f| f.milestone_delay_days = 90)), 10.0);
        assert_eq!(schedule_delay(&with(|f| f.milestone_delay_days = 120)), 10.0);
        let mid = schedule_delay(&with(|f| f.milestone_delay_days = 45));
        assert!((mid - 5.0).abs() < 1e-9);
    }

    // ── complaint_velocity / enforcement_history ─────────────────────

    #[test]
    fn test_complaint_velocity_caps_at_10() {
        assert_eq!(complaint_velocity(&with(|f| f.complaint_count_90d = 3)), 6.0);
        assert_eq!(complaint_velocity(&with(|f| f.complaint_count_90d = 10)), 10.0);
    }

    #[test]
    fn test_enforcement_history_caps_at_10() {
        assert_eq!(enforcement_history(&with(|f| f.prior_stop_work_orders = 1)), 5.0);
        assert_eq!(enforcement_history(&with(|f| f.prior_stop_work_orders = 5)), 10.0);
    }

    // ── building_risk ────────────────────────────────────────────────

    #[test]
    fn test_building_risk_residential_low_rise() {
        // 0.5 * 3 + (1/40) * 2 = 1.55
        let v = building_risk(&FeatureSnapshot::default());
        assert!((v - 1.55).abs() < 1e-9);
    }

    #[test]
    fn test_building_risk_height_capped() {
        let f = with(|f| {
            f.building_type = "industrial".into();
            f.stories = 80;
        });
        // 0.9 * 3 + 1.0 * 2 = 4.7
        assert!((building_risk(&f) - 4.7).abs() < 1e-9);
    }

    #[test]
    fn test_building_risk_unknown_type_mid_value() {
        let f = with(|f| f.building_type = "houseboat".into());
        // 0.6 * 3 + 0.05 * 2 = 1.9
        assert!((building_risk(&f) - 1.9).abs() < 1e-9);
    }

    // ── contractor_risk ──────────────────────────────────────────────

    #[test]
    fn test_contractor_risk_scales_and_clamps() {
        assert_eq!(contractor_risk(&with(|f| f.contractor_violation_rate = 0.4)), 2.0);
        assert_eq!(contractor_risk(&with(|f| f.contractor_violation_rate = 1.7)), 5.0);
        assert_eq!(contractor_risk(&with(|f| f.contractor_violation_rate = -0.3)), 0.0);
        assert_eq!(contractor_risk(&with(|f| f.contractor_violation_rate = f64::NAN)), 0.0);
    }

    // ── compute_all ──────────────────────────────────────────────────

    #[test]
    fn test_compute_all_declaration_order() {
        let all = compute_all(&FeatureSnapshot::default());
        let names: Vec<&str> = all.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, COMPONENT_NAMES);
    }

    #[test]
    fn test_all_components_within_bounds() {
        let f = with(|f| {
            f.violation_classes = vec!["Class C".into()];
            f.permit_age_days = 10_000;
            f.inspection_failures = 99;
            f.inspection_total = 1;
            f.milestone_delay_days = 10_000;
            f.complaint_count_90d = 500;
            f.prior_stop_work_orders = 40;
            f.building_type = "industrial".into();
            f.stories = 200;
            f.contractor_violation_rate = 9.0;
        });
        let bounds = [30.0, 15.0, 15.0, 10.0, 10.0, 10.0, 5.0, 5.0];
        for ((name, value), bound) in compute_all(&f).iter().zip(bounds) {
            assert!(*value >= 0.0 && *value <= bound, "{name} = {value} out of [0, {bound}]");
        }
    }
}
