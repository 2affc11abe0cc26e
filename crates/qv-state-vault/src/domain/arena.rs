//! # State Arena & Entitlement Book
//!
//! Explicit, injected stores replacing hidden process-wide state: an arena
//! of [`VaultState`] records keyed by id, and the entitlement book keyed by
//! `(state, recipient, asset)`.
//!
//! States are never deleted; terminal states remain queryable with their
//! outcome and entanglement history intact.

use super::entities::VaultState;
use super::errors::VaultError;
use super::value_objects::{AccountId, Amount, AssetKind, StateId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Arena of all states known to the engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VaultArena {
    states: HashMap<StateId, VaultState>,
}

impl VaultArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created state. Returns `false` if the id is taken.
    pub fn insert(&mut self, state: VaultState) -> bool {
        if self.states.contains_key(&state.id) {
            return false;
        }
        self.states.insert(state.id, state);
        true
    }

    /// Whether an id is present.
    #[must_use]
    pub fn contains(&self, id: &StateId) -> bool {
        self.states.contains_key(id)
    }

    /// Look up a state.
    pub fn get(&self, id: &StateId) -> Result<&VaultState, VaultError> {
        self.states.get(id).ok_or(VaultError::StateNotFound(*id))
    }

    /// Look up a state mutably.
    pub fn get_mut(&mut self, id: &StateId) -> Result<&mut VaultState, VaultError> {
        self.states
            .get_mut(id)
            .ok_or(VaultError::StateNotFound(*id))
    }

    /// Number of states ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterate over all states.
    pub fn iter(&self) -> impl Iterator<Item = &VaultState> {
        self.states.values()
    }
}

/// Claimable balances owed to recipients from resolved states.
///
/// Credited only by the resolution path, debited only by claims.
#[derive(Clone, Debug, Default)]
pub struct EntitlementBook {
    credits: HashMap<(StateId, AccountId, AssetKind), Amount>,
}

impl EntitlementBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a claimable amount. Zero credits are dropped.
    pub fn credit(&mut self, state: StateId, recipient: AccountId, asset: AssetKind, amount: Amount) {
        if amount == 0 {
            return;
        }
        let entry = self.credits.entry((state, recipient, asset)).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Claimable balance for a `(state, recipient, asset)` key.
    #[must_use]
    pub fn balance(&self, state: &StateId, recipient: &AccountId, asset: &AssetKind) -> Amount {
        self.credits
            .get(&(*state, *recipient, *asset))
            .copied()
            .unwrap_or(0)
    }

    /// Remove and return the full claimable balance (0 if none).
    ///
    /// The claim path zeroes the entitlement with this before invoking the
    /// value ledger, and restores it via [`EntitlementBook::credit`] if the
    /// transfer reports failure.
    pub fn take(&mut self, state: &StateId, recipient: &AccountId, asset: &AssetKind) -> Amount {
        self.credits
            .remove(&(*state, *recipient, *asset))
            .unwrap_or(0)
    }

    /// Total credited for a state and asset, across all recipients.
    #[must_use]
    pub fn total_for_state(&self, state: &StateId, asset: &AssetKind) -> Amount {
        self.credits
            .iter()
            .filter(|((sid, _, a), _)| sid == state && a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }

    /// Number of non-zero entitlement records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.credits.len()
    }

    /// Whether any entitlement is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }
}
