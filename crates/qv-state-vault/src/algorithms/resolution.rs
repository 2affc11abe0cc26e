//! # Outcome Selection
//!
//! Pure per-mechanism outcome selection. Each entry point of the resolution
//! engine picks its outcome here; the selected index is always a member of
//! the state's potential set, keeping resolution total.

use crate::domain::{DefaultOutcomePolicy, OutcomeIndex, VaultError};

/// First entry of a validated potential set.
fn first_listed(potential: &[OutcomeIndex]) -> Result<OutcomeIndex, VaultError> {
    potential
        .first()
        .copied()
        .ok_or_else(|| VaultError::InvalidOutcomeSet("empty potential set".to_string()))
}

/// Manual selection: the chosen index must be a member of the potential set.
pub fn select_manual(
    potential: &[OutcomeIndex],
    chosen: OutcomeIndex,
) -> Result<OutcomeIndex, VaultError> {
    if potential.contains(&chosen) {
        Ok(chosen)
    } else {
        Err(VaultError::InvalidOutcome { index: chosen })
    }
}

/// Default selection for time- and condition-triggered collapse.
///
/// `Fixed` falls back to the first entry when the fixed index is not a
/// member, so the policy never makes resolution partial.
pub fn select_default(
    potential: &[OutcomeIndex],
    policy: DefaultOutcomePolicy,
) -> Result<OutcomeIndex, VaultError> {
    match policy {
        DefaultOutcomePolicy::FirstListed => first_listed(potential),
        DefaultOutcomePolicy::Fixed(index) if potential.contains(&index) => Ok(index),
        DefaultOutcomePolicy::Fixed(_) => first_listed(potential),
    }
}

/// Probabilistic selection: `entropy % len`.
///
/// Uniform only for unweighted potential sets; weighted outcomes would need
/// a cumulative-weight table in place of the modulo.
pub fn select_probabilistic(
    potential: &[OutcomeIndex],
    entropy: u64,
) -> Result<OutcomeIndex, VaultError> {
    if potential.is_empty() {
        return Err(VaultError::InvalidOutcomeSet(
            "empty potential set".to_string(),
        ));
    }
    let index = (entropy % potential.len() as u64) as usize;
    Ok(potential[index])
}

/// Forced selection for cascades: the forcing hint when it is a member,
/// the first entry otherwise. Never fails on a validated set, so a cascade
/// cannot abort a collapse that already committed.
pub fn select_forced(
    potential: &[OutcomeIndex],
    forced: OutcomeIndex,
) -> Result<OutcomeIndex, VaultError> {
    if potential.contains(&forced) {
        Ok(forced)
    } else {
        first_listed(potential)
    }
}
