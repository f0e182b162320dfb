//! # Escalation Graph — Score Bands and Enforcement Tables
//!
//! Static lookup tables mapping risk score bands to escalation levels and
//! `(level, track)` pairs to enforcement-action sets. The tables are
//! read-only constants built into the binary — configuration data, not
//! mutable global state.

use serde::{Deserialize, Serialize};

use crate::components::{class_severity_points, MAX_SEVERITY_POINTS};

/// Enforcement-severity tiers, totally ordered by severity.
///
/// Each level owns a non-overlapping score band; the bands are exhaustive
/// over [0, 100] and scores outside that range clamp to the nearest end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationLevel {
    /// 0–20: informational notice.
    Notice,
    /// 21–40: formal warning.
    Warning,
    /// 41–60: citation with civil penalty.
    Citation,
    /// 61–80: commissioner's order.
    Order,
    /// 81–100: emergency enforcement.
    Emergency,
}

impl EscalationLevel {
    /// Map a risk score to its escalation level.
    ///
    /// Scores below 0 clamp to `Notice`; above 100 clamp to `Emergency`.
    pub fn from_score(score: i64) -> Self {
        match score {
            i64::MIN..=20 => Self::Notice,
            21..=40 => Self::Warning,
            41..=60 => Self::Citation,
            61..=80 => Self::Order,
            _ => Self::Emergency,
        }
    }

    /// The level's identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Warning => "warning",
            Self::Citation => "citation",
            Self::Order => "order",
            Self::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for EscalationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enforcement track selected by the violation class wording.
///
/// An explicit tagged variant rather than substring branching at every
/// call site: classification happens once, lookups are enum-keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationTrack {
    /// Standard enforcement track.
    Default,
    /// Hazardous-condition track: stronger action sets at every level.
    Hazardous,
}

impl ViolationTrack {
    /// Classify a violation-class string into its track.
    ///
    /// Case-insensitive substring match on "hazardous".
    pub fn from_class(class: &str) -> Self {
        if class.to_ascii_lowercase().contains("hazardous") {
            Self::Hazardous
        } else {
            Self::Default
        }
    }
}

/// Whether a class tag carries the maximum severity points ("Class C").
pub fn is_highest_severity_class(class: &str) -> bool {
    class_severity_points(class) >= MAX_SEVERITY_POINTS
}

/// Likely enforcement-category tags for a `(level, track)` pair.
///
/// Ordered lists; forecast assembly unions them preserving first-seen
/// order.
pub fn likely_enforcement_actions(
    level: EscalationLevel,
    track: ViolationTrack,
) -> &'static [&'static str] {
    use EscalationLevel::*;
    use ViolationTrack::*;
    match (level, track) {
        (Notice, Default) => &["warning_letter"],
        (Notice, Hazardous) => &["warning_letter", "follow_up_inspection"],
        (Warning, Default) => &["violation_notice", "compliance_meeting"],
        (Warning, Hazardous) => &["violation_notice", "partial_stop_work"],
        (Citation, Default) => &["civil_penalty", "mandatory_inspection"],
        (Citation, Hazardous) => &["civil_penalty", "partial_stop_work", "mandatory_inspection"],
        (Order, Default) => &["commissioners_order", "escalated_civil_penalty"],
        (Order, Hazardous) => &["full_stop_work_order", "commissioners_order"],
        (Emergency, Default) => &["full_stop_work_order", "emergency_declaration"],
        (Emergency, Hazardous) => {
            &["full_stop_work_order", "emergency_declaration", "vacate_order"]
        }
    }
}

/// Fixed ordered remediation checklist for an escalation level.
pub fn recommended_actions(level: EscalationLevel) -> &'static [&'static str] {
    match level {
        EscalationLevel::Notice => &["schedule_corrective_review", "notify_site_manager"],
        EscalationLevel::Warning => &["submit_corrective_action_plan", "schedule_reinspection"],
        EscalationLevel::Citation => &[
            "retain_compliance_counsel",
            "remediate_cited_conditions",
            "schedule_reinspection",
        ],
        EscalationLevel::Order => &[
            "halt_affected_work",
            "remediate_cited_conditions",
            "request_commissioner_hearing",
        ],
        EscalationLevel::Emergency => &[
            "halt_all_work",
            "secure_site",
            "notify_insurer",
            "request_emergency_hearing",
        ],
    }
}
