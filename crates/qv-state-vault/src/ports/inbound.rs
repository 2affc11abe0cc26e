//! # Inbound Ports
//!
//! API trait defining the full public operation surface of the state
//! vault: state store, custody, resolution, entanglement, claims, and the
//! side-effect-free read operations.

use crate::domain::{
    AccountId, Amount, AssetKind, CollapseMechanism, OutcomeIndex, StateId, StateSummary, UnitType,
    VaultError,
};

/// Parameters for creating a state.
#[derive(Clone, Debug)]
pub struct CreateStateRequest {
    /// Absolute deadline; `0` means none.
    pub expiry: u64,
    /// Opaque bytes compared by equality for conditional resolution.
    pub condition_payload: Vec<u8>,
    /// Non-empty, ordered outcome set, validated against the universe.
    pub potential_outcomes: Vec<OutcomeIndex>,
    /// Permitted resolution trigger. `EntanglementForced` is internal-only
    /// and rejected here.
    pub mechanism: CollapseMechanism,
}

/// State vault API - inbound port.
pub trait StateVaultApi: Send + Sync {
    // -- State store --

    /// Create a new superposed state. The caller becomes creator and
    /// controller.
    fn create(
        &self,
        caller: &AccountId,
        request: CreateStateRequest,
        now: u64,
    ) -> Result<StateId, VaultError>;

    /// Cancel a superposed state, refunding all custody to the creator.
    fn cancel(&self, caller: &AccountId, id: &StateId) -> Result<(), VaultError>;

    /// Extend the expiry to a strictly later deadline.
    fn extend_expiry(
        &self,
        caller: &AccountId,
        id: &StateId,
        new_expiry: u64,
    ) -> Result<(), VaultError>;

    /// Hand control of a superposed state to another account.
    fn transfer_control(
        &self,
        caller: &AccountId,
        id: &StateId,
        new_controller: AccountId,
    ) -> Result<(), VaultError>;

    // -- Custody --

    /// Deposit native value. Zero amounts succeed as no-ops. Returns the
    /// amount actually credited.
    fn deposit_native(
        &self,
        caller: &AccountId,
        id: &StateId,
        amount: Amount,
    ) -> Result<Amount, VaultError>;

    /// Deposit unit value. Zero amounts succeed as no-ops. Returns the
    /// amount actually credited, which for non-standard unit types can be
    /// less than requested.
    fn deposit_unit(
        &self,
        caller: &AccountId,
        id: &StateId,
        unit: UnitType,
        amount: Amount,
    ) -> Result<Amount, VaultError>;

    // -- Resolution --

    /// Resolve manually to a chosen outcome. The caller must be the
    /// controller, or pay the configured resolution fee.
    fn resolve_manual(
        &self,
        caller: &AccountId,
        id: &StateId,
        chosen: OutcomeIndex,
        proof: &[u8],
    ) -> Result<OutcomeIndex, VaultError>;

    /// Resolve a time-expiry state once its deadline has passed. Any caller.
    fn resolve_on_expiry(&self, id: &StateId, now: u64) -> Result<OutcomeIndex, VaultError>;

    /// Resolve a conditional state by presenting a matching payload. Any
    /// caller.
    fn resolve_on_condition(
        &self,
        id: &StateId,
        candidate: &[u8],
    ) -> Result<OutcomeIndex, VaultError>;

    /// Resolve a probabilistic state by consulting the entropy provider.
    fn resolve_probabilistic(&self, id: &StateId, seed: &[u8]) -> Result<OutcomeIndex, VaultError>;

    // -- Entanglement --

    /// Reciprocally link two superposed, unentangled states. The caller
    /// must control both.
    fn link(&self, caller: &AccountId, a: &StateId, b: &StateId) -> Result<(), VaultError>;

    /// Remove a reciprocal link. The caller must control at least one side.
    fn unlink(&self, caller: &AccountId, a: &StateId, b: &StateId) -> Result<(), VaultError>;

    // -- Claims --

    /// Withdraw the caller's full claimable balance for one asset of a
    /// collapsed state. Returns the amount paid out.
    fn claim(
        &self,
        caller: &AccountId,
        id: &StateId,
        asset: AssetKind,
    ) -> Result<Amount, VaultError>;

    // -- Reads (no side effects) --

    /// Full state summary.
    fn summary(&self, id: &StateId) -> Result<StateSummary, VaultError>;

    /// Entanglement partner, if any.
    fn entanglement_partner(&self, id: &StateId) -> Result<Option<StateId>, VaultError>;

    /// Chosen outcome. Fails with `WrongStatus` unless collapsed.
    fn chosen_outcome(&self, id: &StateId) -> Result<OutcomeIndex, VaultError>;

    /// Claimable balance for `(state, recipient, asset)`.
    fn claimable(
        &self,
        id: &StateId,
        recipient: &AccountId,
        asset: &AssetKind,
    ) -> Result<Amount, VaultError>;

    /// Deposited unit types, in first-deposit order.
    fn deposited_units(&self, id: &StateId) -> Result<Vec<UnitType>, VaultError>;

    /// The permitted (or, once collapsed, actually used) mechanism.
    fn collapse_mechanism(&self, id: &StateId) -> Result<CollapseMechanism, VaultError>;

    /// Whether the state's deadline has passed at `now`.
    fn is_past_expiry(&self, id: &StateId, now: u64) -> Result<bool, VaultError>;
}
