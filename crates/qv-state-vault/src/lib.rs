//! # QV State Vault - Conditional Custody & Resolution Engine
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Manages value deposited into named *states*, each locked in an
//! undetermined, superposed condition until a resolution trigger fires.
//! Resolution fixes a definite outcome, converts the locked custody into
//! per-recipient claimable entitlements, and may cascade into an entangled
//! partner state.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Status/outcome coherence | `domain/invariants.rs` - `check_status_outcome_coherence()` |
//! | INVARIANT-2 | Entanglement reciprocity | `domain/invariants.rs` - `check_entanglement_reciprocity()` |
//! | INVARIANT-3 | Custody/list coherence | `domain/invariants.rs` - `check_custody_list_coherence()` |
//! | INVARIANT-4 | Terminal drawdown | `domain/invariants.rs` - `check_terminal_drained()` |
//!
//! ## Resolution Mechanisms
//!
//! | Mechanism | Entry Point | Trigger |
//! |-----------|------------|---------|
//! | `Manual` | `resolve_manual` | Controller, or fee-paying caller |
//! | `TimeExpiry` | `resolve_on_expiry` | Clock past the deadline, any caller |
//! | `Conditional` | `resolve_on_condition` | Byte-equal condition payload |
//! | `ProbabilisticExternal` | `resolve_probabilistic` | External entropy, `entropy % len` |
//! | `EntanglementForced` | internal | Collapse of the entangled partner |
//!
//! ## Re-entrancy Safety
//!
//! All bookkeeping commits before any value-ledger call; claims zero the
//! entitlement before transferring and restore it on reported failure;
//! cascades clear both links before recursing, bounding recursion to one
//! extra frame.
//!
//! ## Usage Example
//!
//! ```
//! use qv_state_vault::prelude::*;
//!
//! let ledger = InMemoryLedger::new();
//! ledger.set_native_balance([0x11u8; 20], 1_000);
//!
//! let vault = StateVaultService::new(ledger, VaultConfig::default()).unwrap();
//! let creator = [0x11u8; 20];
//!
//! let id = vault
//!     .create(
//!         &creator,
//!         CreateStateRequest {
//!             expiry: 0,
//!             condition_payload: Vec::new(),
//!             potential_outcomes: vec![0, 1],
//!             mechanism: CollapseMechanism::Manual,
//!         },
//!         1_000,
//!     )
//!     .unwrap();
//!
//! vault.deposit_native(&creator, &id, 100).unwrap();
//! vault.resolve_manual(&creator, &id, 0, b"settled").unwrap();
//! assert_eq!(vault.claim(&creator, &id, AssetKind::Native).unwrap(), 100);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        CustodySnapshot, DefaultOutcomePolicy, DistributionPolicy, Share, ShareRecipient,
        StateSummary, VaultConfig, VaultState,
    };

    // Value objects
    pub use crate::domain::value_objects::{
        AccountId, Amount, AssetKind, CollapseMechanism, OutcomeIndex, StateId, StateStatus,
        UnitType, NO_EXPIRY,
    };

    // Errors
    pub use crate::domain::errors::VaultError;

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Arena & entitlements
    pub use crate::domain::arena::{EntitlementBook, VaultArena};

    // Algorithms
    pub use crate::algorithms::{compute_payouts, derive_state_id, Payout};

    // Ports
    pub use crate::ports::inbound::{CreateStateRequest, StateVaultApi};
    pub use crate::ports::outbound::{
        AccessPolicy, EntropyProvider, FixedEntropy, MockLedger, NoAdmins, StaticAdmins,
        ValueLedger,
    };

    // Adapters
    pub use crate::adapters::{HashEntropy, InMemoryLedger};

    // Events
    pub use crate::events::{EventRecord, VaultEvent};

    // Service
    pub use crate::service::{ServiceStats, StateVaultService};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
