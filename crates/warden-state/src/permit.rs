//! # Permit Lifecycle State Machine
//!
//! Legal transition rules for construction permits, from filing through
//! expiry or withdrawal. Like the violation machine, this is a stateless
//! lookup-table oracle — callers own the entity state.
//!
//! ## Stages
//!
//! ```text
//! Filed ──▶ PlanReview ──▶ Approved ──▶ Issued ──▶ Suspended ──▶ Issued
//!    │           │                         │            │
//!    │           └──▶ Objection ──▶ PlanReview          │
//!    │                    │                             │
//!    └────────────────────┴──▶ Withdrawn      Expired ◀─┘
//!                              (terminal)    (terminal)
//! ```

use serde::{Deserialize, Serialize};

pub use crate::violation::StateParseError;

/// The lifecycle stage of a permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermitStage {
    /// Application filed with the department.
    Filed,
    /// Plans are under examiner review.
    PlanReview,
    /// Examiner raised an objection; revision required.
    Objection,
    /// Plans approved, permit not yet issued.
    Approved,
    /// Permit issued; work may proceed.
    Issued,
    /// Permit suspended by enforcement action.
    Suspended,
    /// Permit expired (terminal).
    Expired,
    /// Application withdrawn by the filer (terminal).
    Withdrawn,
}

impl PermitStage {
    /// The stages legally reachable from this one. Terminal stages return
    /// an empty slice.
    pub fn next_states(self) -> &'static [PermitStage] {
        match self {
            Self::Filed => &[Self::PlanReview, Self::Withdrawn],
            Self::PlanReview => &[Self::Approved, Self::Objection, Self::Withdrawn],
            Self::Objection => &[Self::PlanReview, Self::Withdrawn],
            Self::Approved => &[Self::Issued, Self::Withdrawn],
            Self::Issued => &[Self::Suspended, Self::Expired],
            Self::Suspended => &[Self::Issued, Self::Expired],
            Self::Expired | Self::Withdrawn => &[],
        }
    }

    /// Whether `target` is a legal transition from this stage.
    pub fn can_transition(self, target: PermitStage) -> bool {
        self.next_states().contains(&target)
    }

    /// Whether this stage has no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        self.next_states().is_empty()
    }
}

impl std::fmt::Display for PermitStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Filed => "FILED",
            Self::PlanReview => "PLAN_REVIEW",
            Self::Objection => "OBJECTION",
            Self::Approved => "APPROVED",
            Self::Issued => "ISSUED",
            Self::Suspended => "SUSPENDED",
            Self::Expired => "EXPIRED",
            Self::Withdrawn => "WITHDRAWN",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for PermitStage {
    type Err = StateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FILED" => Ok(Self::Filed),
            "PLAN_REVIEW" => Ok(Self::PlanReview),
            "OBJECTION" => Ok(Self::Objection),
            "APPROVED" => Ok(Self::Approved),
            "ISSUED" => Ok(Self::Issued),
            "SUSPENDED" => Ok(Self::Suspended),
            "EXPIRED" => Ok(Self::Expired),
            "WITHDRAWN" => Ok(Self::Withdrawn),
            _ => Err(StateParseError::Unknown(s.to_string())),
        }
    }
}
