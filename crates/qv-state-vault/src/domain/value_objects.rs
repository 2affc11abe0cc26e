//! # Domain Value Objects
//!
//! Immutable value types for the state vault: identifiers, the state status
//! machine, and collapse mechanisms.

use serde::{Deserialize, Serialize};

/// State identifier (32-byte SHA-256 derivation).
pub type StateId = [u8; 32];

/// Principal identity (20-byte).
pub type AccountId = [u8; 20];

/// Fungible unit-type identifier (20-byte).
pub type UnitType = [u8; 20];

/// Index into the configured outcome universe.
pub type OutcomeIndex = u16;

/// Custody and entitlement amounts.
pub type Amount = u64;

/// Sentinel expiry meaning "no deadline".
pub const NO_EXPIRY: u64 = 0;

/// Short hex rendering of a state id for logs.
#[must_use]
pub fn short_id(id: &StateId) -> String {
    hex::encode(&id[..6])
}

/// Vault state status machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateStatus {
    /// Undetermined and locked; deposits and edits are allowed.
    #[default]
    Superposed,
    /// Resolved to a definite outcome; custody converted to entitlements.
    Collapsed,
    /// Aborted before resolution; custody refunded to the creator.
    Cancelled,
}

impl StateStatus {
    /// Check if transition is valid.
    #[must_use]
    pub fn can_transition_to(&self, next: StateStatus) -> bool {
        matches!(
            (self, next),
            (Self::Superposed, Self::Collapsed) | (Self::Superposed, Self::Cancelled)
        )
    }

    /// Check if terminal status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Collapsed | Self::Cancelled)
    }
}

/// Trigger type permitted to resolve a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollapseMechanism {
    /// Resolved by explicit authority (the controller, or a fee-paying caller).
    Manual,
    /// Resolved by anyone once the expiry deadline has passed.
    TimeExpiry,
    /// Resolved by presenting a payload byte-equal to the condition payload.
    Conditional,
    /// Resolved by consulting the external entropy provider.
    ProbabilisticExternal,
    /// Forced by the collapse of an entangled partner state. Internal only;
    /// states cannot be created with this mechanism.
    EntanglementForced,
}

impl CollapseMechanism {
    /// Whether an entropy provider must be configured for this mechanism.
    #[must_use]
    pub fn requires_entropy(&self) -> bool {
        matches!(self, Self::ProbabilisticExternal)
    }

    /// Stable label for logs and events.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::TimeExpiry => "time-expiry",
            Self::Conditional => "conditional",
            Self::ProbabilisticExternal => "probabilistic-external",
            Self::EntanglementForced => "entanglement-forced",
        }
    }
}

/// Asset key for custody, distribution, and claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// The native asset.
    Native,
    /// A fungible unit type.
    Unit(UnitType),
}
