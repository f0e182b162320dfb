//! # Violation Lifecycle State Machine
//!
//! Models the legal lifecycle of a recorded violation. The machine is a
//! pure validation oracle: it holds no instance state and performs no side
//! effects. Callers track actual entity state elsewhere and consult
//! [`ViolationState::can_transition`] as a guard.
//!
//! ## States
//!
//! ```text
//! Reported ──▶ Acknowledged ──▶ Remediating ──▶ Resolved (terminal)
//!     │              │
//!     │              └──▶ Contested ──▶ Acknowledged
//!     │                       │
//!     └──────────────────────▶└──▶ Dismissed (terminal)
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The lifecycle state of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationState {
    /// Violation has been reported by an inspector or complaint.
    Reported,
    /// The responsible party has acknowledged the violation.
    Acknowledged,
    /// The responsible party is contesting the violation.
    Contested,
    /// Corrective work is underway.
    Remediating,
    /// Violation has been corrected and closed (terminal).
    Resolved,
    /// Violation was dismissed on review (terminal).
    Dismissed,
}

impl ViolationState {
    /// The states legally reachable from this one. Terminal states return
    /// an empty slice.
    pub fn next_states(self) -> &'static [ViolationState] {
        match self {
            Self::Reported => &[Self::Acknowledged, Self::Dismissed],
            Self::Acknowledged => &[Self::Contested, Self::Remediating],
            Self::Contested => &[Self::Acknowledged, Self::Dismissed],
            Self::Remediating => &[Self::Resolved],
            Self::Resolved | Self::Dismissed => &[],
        }
    }

    /// Whether `target` is a legal transition from this state.
    pub fn can_transition(self, target: ViolationState) -> bool {
        self.next_states().contains(&target)
    }

    /// Whether this state has no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        self.next_states().is_empty()
    }
}

impl std::fmt::Display for ViolationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Reported => "REPORTED",
            Self::Acknowledged => "ACKNOWLEDGED",
            Self::Contested => "CONTESTED",
            Self::Remediating => "REMEDIATING",
            Self::Resolved => "RESOLVED",
            Self::Dismissed => "DISMISSED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ViolationState {
    type Err = StateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "REPORTED" => Ok(Self::Reported),
            "ACKNOWLEDGED" => Ok(Self::Acknowledged),
            "CONTESTED" => Ok(Self::Contested),
            "REMEDIATING" => Ok(Self::Remediating),
            "RESOLVED" => Ok(Self::Resolved),
            "DISMISSED" => Ok(Self::Dismissed),
            _ => Err(StateParseError::Unknown(s.to_string())),
        }
    }
}

/// Error parsing a lifecycle state name.
#[derive(Error, Debug)]
pub enum StateParseError {
    /// The name does not match any state.
    #[error("unknown lifecycle state: {0:?}")]
    Unknown(String),
}
