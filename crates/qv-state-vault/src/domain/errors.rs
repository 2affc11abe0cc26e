//! # Domain Errors
//!
//! Error taxonomy for the state vault. All failures are local and
//! synchronous; the engine has no retry policy and callers decide whether
//! to retry.

use super::value_objects::{CollapseMechanism, OutcomeIndex, StateId, StateStatus};
use thiserror::Error;

/// State vault error types.
#[derive(Debug, Error, Clone)]
pub enum VaultError {
    /// No state exists under the given id.
    #[error("state not found: {}", hex::encode(.0))]
    StateNotFound(StateId),

    /// Operation is invalid for the state's current status.
    #[error("wrong status: expected {expected:?}, actual {actual:?}")]
    WrongStatus {
        /// Status the operation requires.
        expected: StateStatus,
        /// Status the state actually has.
        actual: StateStatus,
    },

    /// Caller is not permitted to perform this operation.
    #[error("not authorized")]
    NotAuthorized,

    /// Chosen outcome is not a member of the state's potential set.
    #[error("invalid outcome: {index}")]
    InvalidOutcome {
        /// The rejected outcome index.
        index: OutcomeIndex,
    },

    /// Potential-outcome set is empty, duplicated, or outside the universe.
    #[error("invalid outcome set: {0}")]
    InvalidOutcomeSet(String),

    /// Requested expiry is not strictly later than the reference point
    /// (the recorded expiry on extension, the clock reading on creation).
    #[error("invalid expiry: current={current}, requested={requested}")]
    InvalidExpiry {
        /// Reference point the request must exceed.
        current: u64,
        /// Expiry that was requested.
        requested: u64,
    },

    /// Expiry-triggered resolution attempted before the deadline.
    #[error("expiry not reached: now={now}, expiry={expiry}")]
    ExpiryNotReached {
        /// Caller-supplied clock reading.
        now: u64,
        /// The state's deadline (0 = none, never reached).
        expiry: u64,
    },

    /// Candidate payload does not byte-match the condition payload.
    #[error("condition not met")]
    ConditionNotMet,

    /// No entropy provider is configured.
    #[error("oracle unavailable")]
    OracleUnavailable,

    /// Entry point does not match the state's collapse mechanism.
    #[error("mechanism mismatch: state uses {actual:?}, entry point is {requested:?}")]
    MechanismMismatch {
        /// Mechanism recorded on the state.
        actual: CollapseMechanism,
        /// Mechanism implied by the entry point.
        requested: CollapseMechanism,
    },

    /// States cannot be created with an internal-only mechanism.
    #[error("unsupported mechanism: {0:?}")]
    UnsupportedMechanism(CollapseMechanism),

    /// One of the states is already entangled.
    #[error("already entangled: {}", hex::encode(.0))]
    AlreadyEntangled(StateId),

    /// Recorded links do not match the given pair.
    #[error("not entangled")]
    NotEntangled,

    /// A state cannot be entangled with itself.
    #[error("self entanglement")]
    SelfEntanglement,

    /// Caller has no claimable balance for this (state, asset).
    #[error("nothing to claim")]
    NothingToClaim,

    /// The value ledger collaborator reported a failed transfer.
    #[error("transfer failed: {0}")]
    TransferFailed(String),

    /// Vault configuration rejected at construction time.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
