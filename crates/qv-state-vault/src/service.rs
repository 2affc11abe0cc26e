//! # State Vault Service
//!
//! Orchestrates the state store, custody ledger, resolution engine,
//! entitlement book, and entanglement index behind the [`StateVaultApi`]
//! inbound port.
//!
//! ## Re-entrancy discipline
//!
//! The engine assumes serialized execution, but the value ledger may
//! re-enter the engine during a transfer. Consequently:
//!
//! - every bookkeeping mutation commits *before* any external transfer;
//! - the book lock is never held across a ledger call;
//! - operations that transfer while a state is still `Superposed`
//!   (deposits, the manual-resolution fee) re-verify the status after
//!   re-acquiring the lock;
//! - cascades clear both entanglement links before recursing, bounding the
//!   recursion to one extra frame.

use crate::algorithms::distribution::compute_payouts;
use crate::algorithms::resolution::{
    select_default, select_forced, select_manual, select_probabilistic,
};
use crate::algorithms::state_id::derive_state_id;
use crate::domain::{
    check_all_invariants, short_id, AccountId, Amount, AssetKind, CollapseMechanism,
    EntitlementBook, InvariantCheckResult, OutcomeIndex, StateId, StateParams, StateStatus,
    StateSummary, UnitType, VaultArena, VaultConfig, VaultError, VaultState, NO_EXPIRY,
};
use crate::events::{EventRecord, VaultEvent};
use crate::ports::inbound::{CreateStateRequest, StateVaultApi};
use crate::ports::outbound::{AccessPolicy, EntropyProvider, NoAdmins, ValueLedger};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Statistics for the state vault service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// States created.
    pub states_created: u64,
    /// Deposits credited (zero-amount no-ops excluded).
    pub deposits_accepted: u64,
    /// States collapsed, cascades included.
    pub states_collapsed: u64,
    /// Cascade-forced collapses.
    pub cascades_forced: u64,
    /// States cancelled.
    pub states_cancelled: u64,
    /// Entitlements paid out.
    pub claims_paid: u64,
    /// Value-ledger failures surfaced to callers.
    pub transfer_failures: u64,
}

/// Mutable service state: the arena, entitlements, counters, event log.
#[derive(Debug, Default)]
struct VaultBook {
    arena: VaultArena,
    entitlements: EntitlementBook,
    sequence: u64,
    event_sequence: u64,
    events: Vec<EventRecord>,
}

impl VaultBook {
    fn record(&mut self, event: VaultEvent) {
        let sequence = self.event_sequence;
        self.event_sequence += 1;
        self.events.push(EventRecord::new(sequence, event));
    }
}

/// The main state vault service.
///
/// Generic over the value ledger; the optional entropy provider and the
/// access policy are held behind their ports.
pub struct StateVaultService<L: ValueLedger> {
    ledger: Arc<L>,
    entropy: Option<Arc<dyn EntropyProvider>>,
    access: Arc<dyn AccessPolicy>,
    config: VaultConfig,
    book: RwLock<VaultBook>,
    stats: RwLock<ServiceStats>,
}

impl<L: ValueLedger> StateVaultService<L> {
    /// Create a service with no entropy provider and no administrators.
    pub fn new(ledger: L, config: VaultConfig) -> Result<Self, VaultError> {
        config.validate()?;
        Ok(Self {
            ledger: Arc::new(ledger),
            entropy: None,
            access: Arc::new(NoAdmins),
            config,
            book: RwLock::new(VaultBook::default()),
            stats: RwLock::new(ServiceStats::default()),
        })
    }

    /// Attach an entropy provider, enabling probabilistic states.
    #[must_use]
    pub fn with_entropy(mut self, entropy: impl EntropyProvider + 'static) -> Self {
        self.entropy = Some(Arc::new(entropy));
        self
    }

    /// Replace the access policy.
    #[must_use]
    pub fn with_access_policy(mut self, access: impl AccessPolicy + 'static) -> Self {
        self.access = Arc::new(access);
        self
    }

    /// The value ledger this service custodies through.
    #[must_use]
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Current service statistics.
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Drain the committed event log.
    pub fn drain_events(&self) -> Vec<EventRecord> {
        std::mem::take(&mut self.book.write().events)
    }

    /// Sweep every state against the domain invariants.
    #[must_use]
    pub fn check_invariants(&self) -> InvariantCheckResult {
        check_all_invariants(&self.book.read().arena)
    }

    fn is_controller_or_admin(&self, caller: &AccountId, state: &VaultState) -> bool {
        caller == &state.controller || self.access.is_admin(caller)
    }

    /// Collapse a state inside an already-held book lock.
    ///
    /// Marks the outcome, records the mechanism actually used, converts the
    /// drained custody into entitlements, then cascades into a still-linked
    /// superposed partner. No external calls happen here.
    fn resolve_in_book(
        &self,
        book: &mut VaultBook,
        id: &StateId,
        outcome: OutcomeIndex,
        mechanism_used: CollapseMechanism,
        proof: Vec<u8>,
    ) -> Result<(), VaultError> {
        let state = book.arena.get_mut(id)?;
        state.chosen_outcome = Some(outcome);
        state.status = StateStatus::Collapsed;
        state.mechanism = mechanism_used;
        let creator = state.creator;
        let controller = state.controller;
        let partner = state.entangled_with.take();
        let snapshot = state.drain_custody();

        let payouts = compute_payouts(
            &snapshot,
            outcome,
            &creator,
            &controller,
            &self.config.distribution,
            &self.config.fallback_recipient,
        );
        for payout in payouts {
            book.entitlements
                .credit(*id, payout.recipient, payout.asset, payout.amount);
        }
        book.record(VaultEvent::StateCollapsed {
            id: *id,
            outcome,
            mechanism: mechanism_used,
            native_distributed: snapshot.native,
            units_distributed: snapshot.units,
            proof,
        });
        self.stats.write().states_collapsed += 1;
        info!(
            id = %short_id(id),
            outcome,
            mechanism = mechanism_used.label(),
            "state collapsed"
        );

        if let Some(partner_id) = partner {
            let eligible = book
                .arena
                .get(&partner_id)
                .map(|p| p.entangled_with == Some(*id) && p.status == StateStatus::Superposed)
                .unwrap_or(false);
            // Clear the partner's side unconditionally; no dangling link
            // may survive a collapse.
            if let Ok(p) = book.arena.get_mut(&partner_id) {
                if p.entangled_with == Some(*id) {
                    p.entangled_with = None;
                }
            }
            if eligible {
                let forced = {
                    let p = book.arena.get(&partner_id)?;
                    select_forced(&p.potential_outcomes, outcome)?
                };
                book.record(VaultEvent::CascadeForced {
                    source: *id,
                    target: partner_id,
                    forced_outcome: forced,
                });
                self.stats.write().cascades_forced += 1;
                debug!(
                    source = %short_id(id),
                    target = %short_id(&partner_id),
                    forced,
                    "cascading collapse into entangled partner"
                );
                // Both links are already clear, so this recursion cannot
                // cascade back.
                self.resolve_in_book(
                    book,
                    &partner_id,
                    forced,
                    CollapseMechanism::EntanglementForced,
                    Vec::new(),
                )?;
            }
        }
        Ok(())
    }

    /// Shared precondition checks for the resolution entry points.
    fn ensure_resolvable(
        state: &VaultState,
        requested: CollapseMechanism,
    ) -> Result<(), VaultError> {
        state.ensure_superposed()?;
        if state.mechanism != requested {
            return Err(VaultError::MechanismMismatch {
                actual: state.mechanism,
                requested,
            });
        }
        Ok(())
    }
}

impl<L: ValueLedger> StateVaultApi for StateVaultService<L> {
    fn create(
        &self,
        caller: &AccountId,
        request: CreateStateRequest,
        now: u64,
    ) -> Result<StateId, VaultError> {
        self.config.validate_outcome_set(&request.potential_outcomes)?;
        if request.mechanism == CollapseMechanism::EntanglementForced {
            return Err(VaultError::UnsupportedMechanism(request.mechanism));
        }
        if request.mechanism.requires_entropy() && self.entropy.is_none() {
            return Err(VaultError::OracleUnavailable);
        }
        if request.expiry != NO_EXPIRY && request.expiry <= now {
            return Err(VaultError::InvalidExpiry {
                current: now,
                requested: request.expiry,
            });
        }

        let mut book = self.book.write();
        let id = loop {
            let sequence = book.sequence;
            book.sequence += 1;
            let id = derive_state_id(caller, sequence, now, &request.condition_payload);
            if !book.arena.contains(&id) {
                break id;
            }
        };
        book.arena.insert(VaultState::new(StateParams {
            id,
            creator: *caller,
            expiry: request.expiry,
            condition_payload: request.condition_payload,
            potential_outcomes: request.potential_outcomes,
            mechanism: request.mechanism,
            created_at: now,
        }));
        book.record(VaultEvent::StateCreated {
            id,
            creator: *caller,
            mechanism: request.mechanism,
            expiry: request.expiry,
        });
        drop(book);
        self.stats.write().states_created += 1;
        info!(
            id = %short_id(&id),
            mechanism = request.mechanism.label(),
            "state created"
        );
        Ok(id)
    }

    fn cancel(&self, caller: &AccountId, id: &StateId) -> Result<(), VaultError> {
        let (snapshot, creator) = {
            let mut book = self.book.write();
            let state = book.arena.get_mut(id)?;
            state.ensure_superposed()?;
            if caller != &state.creator
                && caller != &state.controller
                && !self.access.is_admin(caller)
            {
                return Err(VaultError::NotAuthorized);
            }
            let creator = state.creator;
            let partner = state.entangled_with.take();
            state.status = StateStatus::Cancelled;
            let snapshot = state.drain_custody();
            if let Some(partner_id) = partner {
                if let Ok(p) = book.arena.get_mut(&partner_id) {
                    if p.entangled_with == Some(*id) {
                        p.entangled_with = None;
                    }
                }
            }
            (snapshot, creator)
        };

        // Refund directly to the creator, outside the lock. Funds go back
        // to the proposer even if control was transferred.
        let mut refunded_units = Vec::new();
        let mut failed_units = Vec::new();
        let native_refund = if snapshot.native > 0 {
            self.ledger.transfer_out_native(&creator, snapshot.native)
        } else {
            Ok(())
        };
        for (unit, amount) in &snapshot.units {
            match self.ledger.transfer_out_unit(unit, &creator, *amount) {
                Ok(()) => refunded_units.push((*unit, *amount)),
                Err(_) => failed_units.push((*unit, *amount)),
            }
        }

        if native_refund.is_ok() && failed_units.is_empty() {
            let mut book = self.book.write();
            book.record(VaultEvent::StateCancelled {
                id: *id,
                refunded_to: creator,
                native_refunded: snapshot.native,
                units_refunded: refunded_units,
            });
            drop(book);
            self.stats.write().states_cancelled += 1;
            info!(id = %short_id(id), "state cancelled, custody refunded");
            Ok(())
        } else {
            // Restore everything that did not move and revert the status
            // flip so the caller can retry. The entanglement link is not
            // restored; the partner may have moved on in the meantime.
            let mut book = self.book.write();
            let state = book.arena.get_mut(id)?;
            state.status = StateStatus::Superposed;
            if native_refund.is_err() {
                state.credit_native(snapshot.native);
            }
            for (unit, amount) in failed_units {
                state.credit_unit(unit, amount);
            }
            drop(book);
            self.stats.write().transfer_failures += 1;
            warn!(id = %short_id(id), "cancellation refund failed, custody restored");
            Err(VaultError::TransferFailed(
                "cancellation refund failed; custody restored".to_string(),
            ))
        }
    }

    fn extend_expiry(
        &self,
        caller: &AccountId,
        id: &StateId,
        new_expiry: u64,
    ) -> Result<(), VaultError> {
        let mut book = self.book.write();
        let state = book.arena.get_mut(id)?;
        state.ensure_superposed()?;
        if caller != &state.controller && !self.access.is_admin(caller) {
            return Err(VaultError::NotAuthorized);
        }
        if new_expiry <= state.expiry {
            return Err(VaultError::InvalidExpiry {
                current: state.expiry,
                requested: new_expiry,
            });
        }
        state.expiry = new_expiry;
        book.record(VaultEvent::ExpiryExtended {
            id: *id,
            new_expiry,
        });
        debug!(id = %short_id(id), new_expiry, "expiry extended");
        Ok(())
    }

    fn transfer_control(
        &self,
        caller: &AccountId,
        id: &StateId,
        new_controller: AccountId,
    ) -> Result<(), VaultError> {
        let mut book = self.book.write();
        let state = book.arena.get_mut(id)?;
        state.ensure_superposed()?;
        if caller != &state.controller && !self.access.is_admin(caller) {
            return Err(VaultError::NotAuthorized);
        }
        state.controller = new_controller;
        book.record(VaultEvent::ControlTransferred {
            id: *id,
            new_controller,
        });
        debug!(id = %short_id(id), "control transferred");
        Ok(())
    }

    fn deposit_native(
        &self,
        caller: &AccountId,
        id: &StateId,
        amount: Amount,
    ) -> Result<Amount, VaultError> {
        {
            let book = self.book.read();
            book.arena.get(id)?.ensure_superposed()?;
        }
        if amount == 0 {
            return Ok(0);
        }

        let moved = self.ledger.transfer_in_native(caller, amount)?;
        if moved == 0 {
            return Ok(0);
        }

        let mut book = self.book.write();
        let state = book.arena.get_mut(id)?;
        if state.status != StateStatus::Superposed {
            // The transfer window let a re-entrant call resolve this state;
            // send the funds back rather than strand them in custody.
            let actual = state.status;
            drop(book);
            self.ledger.transfer_out_native(caller, moved)?;
            return Err(VaultError::WrongStatus {
                expected: StateStatus::Superposed,
                actual,
            });
        }
        state.credit_native(moved);
        book.record(VaultEvent::NativeDeposited {
            id: *id,
            from: *caller,
            amount: moved,
        });
        drop(book);
        self.stats.write().deposits_accepted += 1;
        debug!(id = %short_id(id), amount = moved, "native deposit credited");
        Ok(moved)
    }

    fn deposit_unit(
        &self,
        caller: &AccountId,
        id: &StateId,
        unit: UnitType,
        amount: Amount,
    ) -> Result<Amount, VaultError> {
        {
            let book = self.book.read();
            book.arena.get(id)?.ensure_superposed()?;
        }
        if amount == 0 {
            return Ok(0);
        }

        // Credit what the ledger reports as moved, not what was requested;
        // non-standard unit types can silently under-transfer.
        let moved = self.ledger.transfer_in_unit(&unit, caller, amount)?;
        if moved == 0 {
            return Ok(0);
        }

        let mut book = self.book.write();
        let state = book.arena.get_mut(id)?;
        if state.status != StateStatus::Superposed {
            let actual = state.status;
            drop(book);
            self.ledger.transfer_out_unit(&unit, caller, moved)?;
            return Err(VaultError::WrongStatus {
                expected: StateStatus::Superposed,
                actual,
            });
        }
        state.credit_unit(unit, moved);
        book.record(VaultEvent::UnitDeposited {
            id: *id,
            from: *caller,
            unit,
            amount: moved,
        });
        drop(book);
        self.stats.write().deposits_accepted += 1;
        debug!(id = %short_id(id), amount = moved, "unit deposit credited");
        Ok(moved)
    }

    fn resolve_manual(
        &self,
        caller: &AccountId,
        id: &StateId,
        chosen: OutcomeIndex,
        proof: &[u8],
    ) -> Result<OutcomeIndex, VaultError> {
        let fee_required = {
            let book = self.book.read();
            let state = book.arena.get(id)?;
            Self::ensure_resolvable(state, CollapseMechanism::Manual)?;
            select_manual(&state.potential_outcomes, chosen)?;
            if self.is_controller_or_admin(caller, state) {
                0
            } else if self.config.resolution_fee == 0 {
                return Err(VaultError::NotAuthorized);
            } else {
                self.config.resolution_fee
            }
        };

        if fee_required > 0 {
            let moved = self.ledger.transfer_in_native(caller, fee_required)?;
            if moved != fee_required {
                if self.ledger.transfer_out_native(caller, moved).is_err() {
                    warn!(id = %short_id(id), "could not return under-paid resolution fee");
                }
                return Err(VaultError::TransferFailed(format!(
                    "resolution fee under-paid: {moved} < {fee_required}"
                )));
            }
        }

        let mut book = self.book.write();
        let state = book.arena.get(id)?;
        if state.status != StateStatus::Superposed {
            // A re-entrant call resolved the state during the fee transfer.
            let actual = state.status;
            drop(book);
            if fee_required > 0 && self.ledger.transfer_out_native(caller, fee_required).is_err() {
                warn!(id = %short_id(id), "could not return resolution fee");
            }
            return Err(VaultError::WrongStatus {
                expected: StateStatus::Superposed,
                actual,
            });
        }
        if fee_required > 0 {
            book.entitlements.credit(
                *id,
                self.config.fallback_recipient,
                AssetKind::Native,
                fee_required,
            );
        }
        self.resolve_in_book(&mut book, id, chosen, CollapseMechanism::Manual, proof.to_vec())?;
        Ok(chosen)
    }

    fn resolve_on_expiry(&self, id: &StateId, now: u64) -> Result<OutcomeIndex, VaultError> {
        let mut book = self.book.write();
        let state = book.arena.get(id)?;
        Self::ensure_resolvable(state, CollapseMechanism::TimeExpiry)?;
        if !state.is_past_expiry(now) {
            return Err(VaultError::ExpiryNotReached {
                now,
                expiry: state.expiry,
            });
        }
        let outcome = select_default(&state.potential_outcomes, self.config.default_outcome)?;
        self.resolve_in_book(&mut book, id, outcome, CollapseMechanism::TimeExpiry, Vec::new())?;
        Ok(outcome)
    }

    fn resolve_on_condition(
        &self,
        id: &StateId,
        candidate: &[u8],
    ) -> Result<OutcomeIndex, VaultError> {
        let mut book = self.book.write();
        let state = book.arena.get(id)?;
        Self::ensure_resolvable(state, CollapseMechanism::Conditional)?;
        if state.condition_payload != candidate {
            return Err(VaultError::ConditionNotMet);
        }
        let outcome = select_default(&state.potential_outcomes, self.config.default_outcome)?;
        self.resolve_in_book(
            &mut book,
            id,
            outcome,
            CollapseMechanism::Conditional,
            Vec::new(),
        )?;
        Ok(outcome)
    }

    fn resolve_probabilistic(&self, id: &StateId, seed: &[u8]) -> Result<OutcomeIndex, VaultError> {
        let provider = self.entropy.clone().ok_or(VaultError::OracleUnavailable)?;
        {
            let book = self.book.read();
            let state = book.arena.get(id)?;
            Self::ensure_resolvable(state, CollapseMechanism::ProbabilisticExternal)?;
        }

        // Read-only external query, outside the lock.
        let entropy = provider.entropy(seed)?;

        let mut book = self.book.write();
        let state = book.arena.get(id)?;
        Self::ensure_resolvable(state, CollapseMechanism::ProbabilisticExternal)?;
        let outcome = select_probabilistic(&state.potential_outcomes, entropy)?;
        self.resolve_in_book(
            &mut book,
            id,
            outcome,
            CollapseMechanism::ProbabilisticExternal,
            Vec::new(),
        )?;
        Ok(outcome)
    }

    fn link(&self, caller: &AccountId, a: &StateId, b: &StateId) -> Result<(), VaultError> {
        if a == b {
            return Err(VaultError::SelfEntanglement);
        }
        let mut book = self.book.write();
        {
            let state_a = book.arena.get(a)?;
            let state_b = book.arena.get(b)?;
            state_a.ensure_superposed()?;
            state_b.ensure_superposed()?;
            if !self.is_controller_or_admin(caller, state_a)
                || !self.is_controller_or_admin(caller, state_b)
            {
                return Err(VaultError::NotAuthorized);
            }
            if state_a.entangled_with.is_some() {
                return Err(VaultError::AlreadyEntangled(*a));
            }
            if state_b.entangled_with.is_some() {
                return Err(VaultError::AlreadyEntangled(*b));
            }
        }
        book.arena.get_mut(a)?.entangled_with = Some(*b);
        book.arena.get_mut(b)?.entangled_with = Some(*a);
        book.record(VaultEvent::Entangled { a: *a, b: *b });
        info!(a = %short_id(a), b = %short_id(b), "states entangled");
        Ok(())
    }

    fn unlink(&self, caller: &AccountId, a: &StateId, b: &StateId) -> Result<(), VaultError> {
        let mut book = self.book.write();
        {
            let state_a = book.arena.get(a)?;
            let state_b = book.arena.get(b)?;
            if state_a.entangled_with != Some(*b) || state_b.entangled_with != Some(*a) {
                return Err(VaultError::NotEntangled);
            }
            if !self.is_controller_or_admin(caller, state_a)
                && !self.is_controller_or_admin(caller, state_b)
            {
                return Err(VaultError::NotAuthorized);
            }
        }
        book.arena.get_mut(a)?.entangled_with = None;
        book.arena.get_mut(b)?.entangled_with = None;
        book.record(VaultEvent::Disentangled { a: *a, b: *b });
        info!(a = %short_id(a), b = %short_id(b), "states disentangled");
        Ok(())
    }

    fn claim(
        &self,
        caller: &AccountId,
        id: &StateId,
        asset: AssetKind,
    ) -> Result<Amount, VaultError> {
        // Zero the entitlement before transferring; restore it only if the
        // ledger reports failure.
        let amount = {
            let mut book = self.book.write();
            let state = book.arena.get(id)?;
            if state.status != StateStatus::Collapsed {
                return Err(VaultError::WrongStatus {
                    expected: StateStatus::Collapsed,
                    actual: state.status,
                });
            }
            let amount = book.entitlements.take(id, caller, &asset);
            if amount == 0 {
                return Err(VaultError::NothingToClaim);
            }
            amount
        };

        let transfer = match asset {
            AssetKind::Native => self.ledger.transfer_out_native(caller, amount),
            AssetKind::Unit(unit) => self.ledger.transfer_out_unit(&unit, caller, amount),
        };

        match transfer {
            Ok(()) => {
                let mut book = self.book.write();
                book.record(VaultEvent::EntitlementClaimed {
                    id: *id,
                    recipient: *caller,
                    asset,
                    amount,
                });
                drop(book);
                self.stats.write().claims_paid += 1;
                info!(id = %short_id(id), amount, "entitlement claimed");
                Ok(amount)
            }
            Err(err) => {
                self.book.write().entitlements.credit(*id, *caller, asset, amount);
                self.stats.write().transfer_failures += 1;
                warn!(id = %short_id(id), amount, "claim transfer failed, entitlement restored");
                Err(err)
            }
        }
    }

    fn summary(&self, id: &StateId) -> Result<StateSummary, VaultError> {
        let book = self.book.read();
        Ok(StateSummary::from(book.arena.get(id)?))
    }

    fn entanglement_partner(&self, id: &StateId) -> Result<Option<StateId>, VaultError> {
        let book = self.book.read();
        Ok(book.arena.get(id)?.entangled_with)
    }

    fn chosen_outcome(&self, id: &StateId) -> Result<OutcomeIndex, VaultError> {
        let book = self.book.read();
        let state = book.arena.get(id)?;
        match (state.status, state.chosen_outcome) {
            (StateStatus::Collapsed, Some(outcome)) => Ok(outcome),
            _ => Err(VaultError::WrongStatus {
                expected: StateStatus::Collapsed,
                actual: state.status,
            }),
        }
    }

    fn claimable(
        &self,
        id: &StateId,
        recipient: &AccountId,
        asset: &AssetKind,
    ) -> Result<Amount, VaultError> {
        let book = self.book.read();
        book.arena.get(id)?;
        Ok(book.entitlements.balance(id, recipient, asset))
    }

    fn deposited_units(&self, id: &StateId) -> Result<Vec<UnitType>, VaultError> {
        let book = self.book.read();
        Ok(book.arena.get(id)?.deposited_units.clone())
    }

    fn collapse_mechanism(&self, id: &StateId) -> Result<CollapseMechanism, VaultError> {
        let book = self.book.read();
        Ok(book.arena.get(id)?.mechanism)
    }

    fn is_past_expiry(&self, id: &StateId, now: u64) -> Result<bool, VaultError> {
        let book = self.book.read();
        Ok(book.arena.get(id)?.is_past_expiry(now))
    }
}
