//! # Event Log
//!
//! Typed records of every committed state transition. The service appends;
//! the host drains. These are engine-internal audit records, not a
//! transport: nothing subscribes to them and failed operations append
//! nothing.

use crate::domain::{
    AccountId, Amount, AssetKind, CollapseMechanism, OutcomeIndex, StateId, UnitType,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A committed state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEvent {
    /// A state was created.
    StateCreated {
        /// New state.
        id: StateId,
        /// Creator (and initial controller).
        creator: AccountId,
        /// Permitted mechanism.
        mechanism: CollapseMechanism,
        /// Deadline (0 = none).
        expiry: u64,
    },
    /// Native value entered custody.
    NativeDeposited {
        /// Target state.
        id: StateId,
        /// Depositor.
        from: AccountId,
        /// Amount credited.
        amount: Amount,
    },
    /// Unit value entered custody.
    UnitDeposited {
        /// Target state.
        id: StateId,
        /// Depositor.
        from: AccountId,
        /// Unit type.
        unit: UnitType,
        /// Amount credited (actual, post any under-transfer).
        amount: Amount,
    },
    /// The deadline moved later.
    ExpiryExtended {
        /// Target state.
        id: StateId,
        /// New deadline.
        new_expiry: u64,
    },
    /// Control handed to a new account.
    ControlTransferred {
        /// Target state.
        id: StateId,
        /// New controller.
        new_controller: AccountId,
    },
    /// Two states were reciprocally linked.
    Entangled {
        /// One side.
        a: StateId,
        /// Other side.
        b: StateId,
    },
    /// A reciprocal link was removed.
    Disentangled {
        /// One side.
        a: StateId,
        /// Other side.
        b: StateId,
    },
    /// A state collapsed to a definite outcome.
    StateCollapsed {
        /// Resolved state.
        id: StateId,
        /// Chosen outcome.
        outcome: OutcomeIndex,
        /// Mechanism actually used.
        mechanism: CollapseMechanism,
        /// Native value distributed into entitlements.
        native_distributed: Amount,
        /// Unit value distributed, in deposit order.
        units_distributed: Vec<(UnitType, Amount)>,
        /// Caller-supplied proof bytes for manual resolution, empty
        /// otherwise.
        proof: Vec<u8>,
    },
    /// A collapse cascaded into the entangled partner.
    CascadeForced {
        /// The state whose collapse triggered the cascade.
        source: StateId,
        /// The partner that was force-resolved.
        target: StateId,
        /// Forcing hint passed to the partner.
        forced_outcome: OutcomeIndex,
    },
    /// A state was cancelled and its custody refunded.
    StateCancelled {
        /// Cancelled state.
        id: StateId,
        /// Refund recipient (the creator).
        refunded_to: AccountId,
        /// Native value refunded.
        native_refunded: Amount,
        /// Unit value refunded, in deposit order.
        units_refunded: Vec<(UnitType, Amount)>,
    },
    /// An entitlement was paid out.
    EntitlementClaimed {
        /// Source state.
        id: StateId,
        /// Claimant.
        recipient: AccountId,
        /// Asset claimed.
        asset: AssetKind,
        /// Amount paid.
        amount: Amount,
    },
}

impl VaultEvent {
    /// Stable topic label for filtering.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::StateCreated { .. } => "state.created",
            Self::NativeDeposited { .. } | Self::UnitDeposited { .. } => "custody.deposited",
            Self::ExpiryExtended { .. } => "state.expiry-extended",
            Self::ControlTransferred { .. } => "state.control-transferred",
            Self::Entangled { .. } => "entanglement.linked",
            Self::Disentangled { .. } => "entanglement.unlinked",
            Self::StateCollapsed { .. } => "state.collapsed",
            Self::CascadeForced { .. } => "entanglement.cascade",
            Self::StateCancelled { .. } => "state.cancelled",
            Self::EntitlementClaimed { .. } => "entitlement.claimed",
        }
    }
}

/// An event with its identity and position in the log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique event id.
    pub event_id: Uuid,
    /// Monotonic position in the log.
    pub sequence: u64,
    /// The transition.
    pub event: VaultEvent,
}

impl EventRecord {
    /// Wrap an event at the given log position.
    #[must_use]
    pub fn new(sequence: u64, event: VaultEvent) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            sequence,
            event,
        }
    }
}
