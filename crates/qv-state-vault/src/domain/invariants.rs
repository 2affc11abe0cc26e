//! # Domain Invariants
//!
//! Critical invariants that MUST hold for every state in the arena:
//!
//! - INVARIANT-1: Status/outcome coherence — `Superposed` states have no
//!   chosen outcome; `Collapsed` states have one, drawn from their
//!   potential set.
//! - INVARIANT-2: Entanglement reciprocity — a recorded link always points
//!   at an existing state whose link points back.
//! - INVARIANT-3: Custody/list coherence — every non-zero unit balance is
//!   registered in the deposited-unit list, and vice versa.
//! - INVARIANT-4: Terminal drawdown — terminal states hold no custody.

use super::arena::VaultArena;
use super::entities::VaultState;
use super::value_objects::{StateId, StateStatus};
use serde::{Deserialize, Serialize};

/// INVARIANT-1: Status/outcome coherence.
#[must_use]
pub fn check_status_outcome_coherence(state: &VaultState) -> bool {
    match state.status {
        StateStatus::Superposed | StateStatus::Cancelled => state.chosen_outcome.is_none(),
        StateStatus::Collapsed => state
            .chosen_outcome
            .is_some_and(|o| state.is_potential_outcome(o)),
    }
}

/// INVARIANT-2: Entanglement reciprocity.
#[must_use]
pub fn check_entanglement_reciprocity(arena: &VaultArena, state: &VaultState) -> bool {
    match state.entangled_with {
        None => true,
        Some(partner_id) => arena
            .get(&partner_id)
            .map(|partner| partner.entangled_with == Some(state.id))
            .unwrap_or(false),
    }
}

/// INVARIANT-3: Custody/list coherence.
#[must_use]
pub fn check_custody_list_coherence(state: &VaultState) -> bool {
    let balances_listed = state
        .unit_balances
        .iter()
        .all(|(unit, amount)| *amount == 0 || state.deposited_units.contains(unit));
    let listed_backed = state
        .deposited_units
        .iter()
        .all(|unit| state.unit_balances.get(unit).copied().unwrap_or(0) > 0);
    balances_listed && listed_backed
}

/// INVARIANT-4: Terminal drawdown.
#[must_use]
pub fn check_terminal_drained(state: &VaultState) -> bool {
    !state.status.is_terminal() || !state.has_custody()
}

/// A detected invariant violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvariantViolation {
    /// Status and chosen outcome disagree.
    StatusOutcomeMismatch {
        /// Offending state.
        id: StateId,
    },
    /// Link is dangling or not reciprocated.
    NonReciprocalLink {
        /// Offending state.
        id: StateId,
        /// Recorded partner.
        partner: StateId,
    },
    /// Unit balances and the deposited-unit list disagree.
    CustodyListMismatch {
        /// Offending state.
        id: StateId,
    },
    /// A terminal state still holds custody.
    TerminalNotDrained {
        /// Offending state.
        id: StateId,
    },
}

/// Result of a full invariant sweep.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InvariantCheckResult {
    /// Every violation found.
    pub violations: Vec<InvariantViolation>,
}

impl InvariantCheckResult {
    /// True when no violation was found.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Sweep every state in the arena against all invariants.
#[must_use]
pub fn check_all_invariants(arena: &VaultArena) -> InvariantCheckResult {
    let mut result = InvariantCheckResult::default();

    for state in arena.iter() {
        if !check_status_outcome_coherence(state) {
            result
                .violations
                .push(InvariantViolation::StatusOutcomeMismatch { id: state.id });
        }
        if !check_entanglement_reciprocity(arena, state) {
            if let Some(partner) = state.entangled_with {
                result.violations.push(InvariantViolation::NonReciprocalLink {
                    id: state.id,
                    partner,
                });
            }
        }
        if !check_custody_list_coherence(state) {
            result
                .violations
                .push(InvariantViolation::CustodyListMismatch { id: state.id });
        }
        if !check_terminal_drained(state) {
            result
                .violations
                .push(InvariantViolation::TerminalNotDrained { id: state.id });
        }
    }

    result
}
