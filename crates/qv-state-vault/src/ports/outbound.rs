//! # Outbound Ports
//!
//! Traits for the engine's external collaborators: the value ledger that
//! moves custody, the entropy provider consulted for probabilistic
//! resolution, and the access policy for administrative overrides.
//!
//! All collaborators return synchronously with a success/failure signal;
//! the engine has no asynchronous suspension model.

use crate::domain::{AccountId, Amount, UnitType, VaultError};
use parking_lot::Mutex;

/// Value transfer collaborator.
///
/// Inbound transfers report the *actual* amount moved, which can be less
/// than requested for non-standard unit types; the engine credits only
/// what was actually received. Outbound transfers are atomic and
/// all-or-nothing.
pub trait ValueLedger: Send + Sync {
    /// Pull native value from `from` into custody. Returns the amount moved.
    fn transfer_in_native(&self, from: &AccountId, amount: Amount) -> Result<Amount, VaultError>;

    /// Push native value from custody to `to`.
    fn transfer_out_native(&self, to: &AccountId, amount: Amount) -> Result<(), VaultError>;

    /// Pull unit value from `from` into custody. Returns the amount moved.
    fn transfer_in_unit(
        &self,
        unit: &UnitType,
        from: &AccountId,
        amount: Amount,
    ) -> Result<Amount, VaultError>;

    /// Push unit value from custody to `to`.
    fn transfer_out_unit(
        &self,
        unit: &UnitType,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), VaultError>;
}

/// External entropy source for probabilistic resolution. Read-only.
pub trait EntropyProvider: Send + Sync {
    /// Produce an unsigned entropy word for the given seed.
    fn entropy(&self, seed: &[u8]) -> Result<u64, VaultError>;
}

/// Administrative-override policy.
///
/// Creator/controller checks are identity comparisons done by the engine;
/// this port only answers whether a caller is an authorized administrator.
pub trait AccessPolicy: Send + Sync {
    /// Whether the account may act with administrative authority.
    fn is_admin(&self, account: &AccountId) -> bool;
}

/// Access policy with no administrators.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAdmins;

impl AccessPolicy for NoAdmins {
    fn is_admin(&self, _account: &AccountId) -> bool {
        false
    }
}

/// Access policy backed by a fixed administrator list.
#[derive(Clone, Debug, Default)]
pub struct StaticAdmins {
    /// Authorized administrator accounts.
    pub admins: Vec<AccountId>,
}

impl StaticAdmins {
    /// Create a policy from a list of administrators.
    #[must_use]
    pub fn new(admins: Vec<AccountId>) -> Self {
        Self { admins }
    }
}

impl AccessPolicy for StaticAdmins {
    fn is_admin(&self, account: &AccountId) -> bool {
        self.admins.contains(account)
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock ledger that accepts every transfer, with optional failure injection.
///
/// Moves exactly the requested amount; the richer
/// [`crate::adapters::InMemoryLedger`] tracks balances and under-transfer.
#[derive(Debug, Default)]
pub struct MockLedger {
    fail_outbound: Mutex<bool>,
    fail_inbound: Mutex<bool>,
}

impl MockLedger {
    /// Create a mock that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle outbound failure injection.
    pub fn set_fail_outbound(&self, fail: bool) {
        *self.fail_outbound.lock() = fail;
    }

    /// Toggle inbound failure injection.
    pub fn set_fail_inbound(&self, fail: bool) {
        *self.fail_inbound.lock() = fail;
    }

    fn check_inbound(&self) -> Result<(), VaultError> {
        if *self.fail_inbound.lock() {
            Err(VaultError::TransferFailed("mock inbound failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_outbound(&self) -> Result<(), VaultError> {
        if *self.fail_outbound.lock() {
            Err(VaultError::TransferFailed(
                "mock outbound failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl ValueLedger for MockLedger {
    fn transfer_in_native(&self, _from: &AccountId, amount: Amount) -> Result<Amount, VaultError> {
        self.check_inbound()?;
        Ok(amount)
    }

    fn transfer_out_native(&self, _to: &AccountId, _amount: Amount) -> Result<(), VaultError> {
        self.check_outbound()
    }

    fn transfer_in_unit(
        &self,
        _unit: &UnitType,
        _from: &AccountId,
        amount: Amount,
    ) -> Result<Amount, VaultError> {
        self.check_inbound()?;
        Ok(amount)
    }

    fn transfer_out_unit(
        &self,
        _unit: &UnitType,
        _to: &AccountId,
        _amount: Amount,
    ) -> Result<(), VaultError> {
        self.check_outbound()
    }
}

/// Entropy provider returning a fixed word, for deterministic tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedEntropy(
    /// The word returned for every seed.
    pub u64,
);

impl EntropyProvider for FixedEntropy {
    fn entropy(&self, _seed: &[u8]) -> Result<u64, VaultError> {
        Ok(self.0)
    }
}
