//! # Domain Entities
//!
//! The central custody record ([`VaultState`]), its construction parameters,
//! the distribution policy types, and the vault configuration.

use super::errors::VaultError;
use super::value_objects::{
    AccountId, Amount, CollapseMechanism, OutcomeIndex, StateId, StateStatus, UnitType, NO_EXPIRY,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Basis-point denominator for share arithmetic (100% = 10_000 bps).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// A superposed custody record awaiting resolution into a single outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultState {
    /// Unique identifier, assigned at creation.
    pub id: StateId,
    /// Original proposer; cancellation refunds go here.
    pub creator: AccountId,
    /// Current manager; may cancel, extend, or manually resolve.
    pub controller: AccountId,
    /// Current status.
    pub status: StateStatus,
    /// Absolute deadline; [`NO_EXPIRY`] means none.
    pub expiry: u64,
    /// Opaque bytes compared by equality for conditional resolution.
    pub condition_payload: Vec<u8>,
    /// Non-empty, ordered set of outcome indices this state may resolve to.
    pub potential_outcomes: Vec<OutcomeIndex>,
    /// Unset while `Superposed`; a member of `potential_outcomes` once
    /// `Collapsed`.
    pub chosen_outcome: Option<OutcomeIndex>,
    /// Trigger type permitted to resolve this state. Overwritten with
    /// `EntanglementForced` when a cascade resolves it, for audit purposes.
    pub mechanism: CollapseMechanism,
    /// Native custody balance.
    pub native_balance: Amount,
    /// Per-unit-type custody balances.
    pub unit_balances: HashMap<UnitType, Amount>,
    /// Unit types actually deposited, in first-deposit order. The balance
    /// map alone cannot be iterated deterministically.
    pub deposited_units: Vec<UnitType>,
    /// Reciprocal link to exactly one other state.
    pub entangled_with: Option<StateId>,
    /// Creation clock reading.
    pub created_at: u64,
}

/// Parameters for creating a [`VaultState`].
#[derive(Clone, Debug)]
pub struct StateParams {
    /// Assigned identifier.
    pub id: StateId,
    /// Creator (initially also the controller).
    pub creator: AccountId,
    /// Absolute deadline; [`NO_EXPIRY`] means none.
    pub expiry: u64,
    /// Condition payload for `Conditional` resolution.
    pub condition_payload: Vec<u8>,
    /// Validated potential-outcome set.
    pub potential_outcomes: Vec<OutcomeIndex>,
    /// Permitted resolution trigger.
    pub mechanism: CollapseMechanism,
    /// Creation clock reading.
    pub created_at: u64,
}

/// Custody drained from a state at the moment of collapse or cancellation.
///
/// Unit entries preserve first-deposit order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustodySnapshot {
    /// Native amount held.
    pub native: Amount,
    /// `(unit type, amount)` pairs, non-zero only.
    pub units: Vec<(UnitType, Amount)>,
}

impl CustodySnapshot {
    /// True when no value was held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.native == 0 && self.units.is_empty()
    }
}

impl VaultState {
    /// Create a new superposed state.
    pub fn new(params: StateParams) -> Self {
        Self {
            id: params.id,
            creator: params.creator,
            controller: params.creator,
            status: StateStatus::Superposed,
            expiry: params.expiry,
            condition_payload: params.condition_payload,
            potential_outcomes: params.potential_outcomes,
            chosen_outcome: None,
            mechanism: params.mechanism,
            native_balance: 0,
            unit_balances: HashMap::new(),
            deposited_units: Vec::new(),
            entangled_with: None,
            created_at: params.created_at,
        }
    }

    /// Check if the deadline has passed. States with no deadline never expire.
    #[must_use]
    pub fn is_past_expiry(&self, now: u64) -> bool {
        self.expiry != NO_EXPIRY && now >= self.expiry
    }

    /// Fail with `WrongStatus` unless the state is still superposed.
    pub fn ensure_superposed(&self) -> Result<(), VaultError> {
        if self.status == StateStatus::Superposed {
            Ok(())
        } else {
            Err(VaultError::WrongStatus {
                expected: StateStatus::Superposed,
                actual: self.status,
            })
        }
    }

    /// Check membership in the potential-outcome set.
    #[must_use]
    pub fn is_potential_outcome(&self, index: OutcomeIndex) -> bool {
        self.potential_outcomes.contains(&index)
    }

    /// Credit native custody.
    pub fn credit_native(&mut self, amount: Amount) {
        self.native_balance = self.native_balance.saturating_add(amount);
    }

    /// Credit unit custody, registering the unit type exactly once.
    pub fn credit_unit(&mut self, unit: UnitType, amount: Amount) {
        if amount == 0 {
            return;
        }
        let balance = self.unit_balances.entry(unit).or_insert(0);
        *balance = balance.saturating_add(amount);
        if !self.deposited_units.contains(&unit) {
            self.deposited_units.push(unit);
        }
    }

    /// Drain all custody to zero, clearing the deposited-unit list.
    ///
    /// Returns the snapshot in deposit order. Called exactly once per state,
    /// at the moment of collapse or cancellation.
    pub fn drain_custody(&mut self) -> CustodySnapshot {
        let native = std::mem::take(&mut self.native_balance);
        let mut units = Vec::with_capacity(self.deposited_units.len());
        for unit in self.deposited_units.drain(..) {
            if let Some(amount) = self.unit_balances.remove(&unit) {
                if amount > 0 {
                    units.push((unit, amount));
                }
            }
        }
        self.unit_balances.clear();
        CustodySnapshot { native, units }
    }

    /// True while any custody remains recorded.
    #[must_use]
    pub fn has_custody(&self) -> bool {
        self.native_balance > 0 || self.unit_balances.values().any(|a| *a > 0)
    }
}

/// Read model for the exposed state-summary query.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateSummary {
    /// State identifier.
    pub id: StateId,
    /// Original proposer.
    pub creator: AccountId,
    /// Current manager.
    pub controller: AccountId,
    /// Current status.
    pub status: StateStatus,
    /// Deadline (0 = none).
    pub expiry: u64,
    /// Permitted (or actually used) resolution trigger.
    pub mechanism: CollapseMechanism,
    /// Potential-outcome set.
    pub potential_outcomes: Vec<OutcomeIndex>,
    /// Outcome, once collapsed.
    pub chosen_outcome: Option<OutcomeIndex>,
    /// Native custody held.
    pub native_balance: Amount,
    /// Unit types deposited, in order.
    pub deposited_units: Vec<UnitType>,
    /// Entanglement partner, if any.
    pub entangled_with: Option<StateId>,
    /// Creation clock reading.
    pub created_at: u64,
}

impl From<&VaultState> for StateSummary {
    fn from(state: &VaultState) -> Self {
        Self {
            id: state.id,
            creator: state.creator,
            controller: state.controller,
            status: state.status,
            expiry: state.expiry,
            mechanism: state.mechanism,
            potential_outcomes: state.potential_outcomes.clone(),
            chosen_outcome: state.chosen_outcome,
            native_balance: state.native_balance,
            deposited_units: state.deposited_units.clone(),
            entangled_with: state.entangled_with,
            created_at: state.created_at,
        }
    }
}

/// Recipient of a distribution share, resolved against the collapsing state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareRecipient {
    /// The state's creator.
    Creator,
    /// The state's current controller.
    Controller,
    /// The configured fallback recipient.
    Fallback,
    /// A fixed account.
    Account(AccountId),
}

/// One distribution share in basis points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Who receives this share.
    pub recipient: ShareRecipient,
    /// Share size, out of [`BPS_DENOMINATOR`].
    pub bps: u16,
}

impl Share {
    /// Convenience constructor.
    #[must_use]
    pub fn new(recipient: ShareRecipient, bps: u16) -> Self {
        Self { recipient, bps }
    }
}

/// Mapping from outcome index to distribution shares.
///
/// Shares per outcome must sum to at most 100%; any undistributed remainder
/// is credited to the fallback recipient. Outcomes with no rule route
/// everything to the fallback recipient, so value can never become
/// unclaimable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DistributionPolicy {
    rules: HashMap<OutcomeIndex, Vec<Share>>,
}

impl DistributionPolicy {
    /// Empty policy: every outcome routes to the fallback recipient.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the shares for an outcome, replacing any previous rule.
    pub fn set_rule(&mut self, outcome: OutcomeIndex, shares: Vec<Share>) {
        self.rules.insert(outcome, shares);
    }

    /// Builder-style rule registration.
    #[must_use]
    pub fn with_rule(mut self, outcome: OutcomeIndex, shares: Vec<Share>) -> Self {
        self.set_rule(outcome, shares);
        self
    }

    /// Shares for an outcome, if a rule exists.
    #[must_use]
    pub fn rule_for(&self, outcome: OutcomeIndex) -> Option<&[Share]> {
        self.rules.get(&outcome).map(Vec::as_slice)
    }

    /// Validate that no rule over-allocates.
    pub fn validate(&self) -> Result<(), VaultError> {
        for (outcome, shares) in &self.rules {
            let total: u64 = shares.iter().map(|s| u64::from(s.bps)).sum();
            if total > BPS_DENOMINATOR {
                return Err(VaultError::InvalidConfig(format!(
                    "outcome {outcome}: shares sum to {total} bps (> {BPS_DENOMINATOR})"
                )));
            }
        }
        Ok(())
    }
}

/// Outcome selection rule for time- and condition-triggered collapse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultOutcomePolicy {
    /// Select the first entry of the potential-outcome set.
    #[default]
    FirstListed,
    /// Select the given index when it is a member of the potential set;
    /// fall back to the first entry otherwise.
    Fixed(OutcomeIndex),
}

/// Vault configuration. Fully specified before deployment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Number of known outcomes; potential sets are validated against
    /// `0..outcome_universe`.
    pub outcome_universe: OutcomeIndex,
    /// Recipient of undistributed remainders and unruled outcomes.
    pub fallback_recipient: AccountId,
    /// Native fee a non-controller pays to resolve manually. `0` disables
    /// fee-paid resolution entirely.
    pub resolution_fee: Amount,
    /// Outcome selection for time- and condition-triggered collapse.
    pub default_outcome: DefaultOutcomePolicy,
    /// Outcome-to-shares table.
    pub distribution: DistributionPolicy,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            outcome_universe: 16,
            fallback_recipient: [0xFEu8; 20],
            resolution_fee: 0,
            default_outcome: DefaultOutcomePolicy::FirstListed,
            distribution: DistributionPolicy::new()
                // Outcome 0: everything to the creator.
                .with_rule(0, vec![Share::new(ShareRecipient::Creator, 10_000)])
                // Outcome 1: 50/50 split between controller and creator.
                .with_rule(
                    1,
                    vec![
                        Share::new(ShareRecipient::Controller, 5_000),
                        Share::new(ShareRecipient::Creator, 5_000),
                    ],
                ),
        }
    }
}

impl VaultConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.outcome_universe == 0 {
            return Err(VaultError::InvalidConfig(
                "outcome universe is empty".to_string(),
            ));
        }
        self.distribution.validate()
    }

    /// Validate a potential-outcome set against the universe: non-empty,
    /// duplicate-free, every index known.
    pub fn validate_outcome_set(&self, outcomes: &[OutcomeIndex]) -> Result<(), VaultError> {
        if outcomes.is_empty() {
            return Err(VaultError::InvalidOutcomeSet(
                "potential-outcome set is empty".to_string(),
            ));
        }
        for (position, outcome) in outcomes.iter().enumerate() {
            if *outcome >= self.outcome_universe {
                return Err(VaultError::InvalidOutcomeSet(format!(
                    "outcome {outcome} outside universe of {}",
                    self.outcome_universe
                )));
            }
            if outcomes[..position].contains(outcome) {
                return Err(VaultError::InvalidOutcomeSet(format!(
                    "duplicate outcome {outcome}"
                )));
            }
        }
        Ok(())
    }
}
