//! # warden-state — Lifecycle State Machines
//!
//! Two independent finite-state models encoding legal transition rules:
//! the violation lifecycle and the permit lifecycle. Both are stateless
//! lookup-table machines exposing `can_transition` and `next_states` —
//! pure validation oracles with no side effects, consumed as transition
//! guards by calling code that tracks actual entity state elsewhere.
//!
//! Unlike stateful wrappers, these machines never mutate anything: a
//! terminal state is simply one whose `next_states()` slice is empty.

pub mod permit;
pub mod violation;

pub use permit::PermitStage;
pub use violation::{StateParseError, ViolationState};
