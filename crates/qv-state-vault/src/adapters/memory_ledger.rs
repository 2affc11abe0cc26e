//! # In-Memory Value Ledger
//!
//! Full value-ledger implementation for hosting the engine in tests and
//! simulations: per-account native and unit balances, a custody account,
//! per-unit transfer haircuts (fee-on-transfer units that silently
//! under-deliver), and failure injection.

use crate::domain::{AccountId, Amount, UnitType, VaultError, BPS_DENOMINATOR};
use crate::ports::outbound::ValueLedger;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct LedgerBook {
    native: HashMap<AccountId, Amount>,
    units: HashMap<(UnitType, AccountId), Amount>,
    custody_native: Amount,
    custody_units: HashMap<UnitType, Amount>,
    haircut_bps: HashMap<UnitType, u16>,
    fail_outbound: bool,
    fail_inbound: bool,
}

/// In-memory ledger with balance tracking.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    book: Mutex<LedgerBook>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an account's native balance.
    pub fn set_native_balance(&self, account: AccountId, amount: Amount) {
        self.book.lock().native.insert(account, amount);
    }

    /// Set an account's unit balance.
    pub fn set_unit_balance(&self, unit: UnitType, account: AccountId, amount: Amount) {
        self.book.lock().units.insert((unit, account), amount);
    }

    /// An account's native balance.
    #[must_use]
    pub fn native_balance_of(&self, account: &AccountId) -> Amount {
        self.book.lock().native.get(account).copied().unwrap_or(0)
    }

    /// An account's unit balance.
    #[must_use]
    pub fn unit_balance_of(&self, unit: &UnitType, account: &AccountId) -> Amount {
        self.book
            .lock()
            .units
            .get(&(*unit, *account))
            .copied()
            .unwrap_or(0)
    }

    /// Native value currently held in custody.
    #[must_use]
    pub fn custody_native(&self) -> Amount {
        self.book.lock().custody_native
    }

    /// Unit value currently held in custody.
    #[must_use]
    pub fn custody_unit(&self, unit: &UnitType) -> Amount {
        self.book
            .lock()
            .custody_units
            .get(unit)
            .copied()
            .unwrap_or(0)
    }

    /// Configure a unit type to under-deliver by `bps` on inbound transfers.
    pub fn set_unit_haircut(&self, unit: UnitType, bps: u16) {
        self.book.lock().haircut_bps.insert(unit, bps);
    }

    /// Toggle outbound failure injection.
    pub fn set_fail_outbound(&self, fail: bool) {
        self.book.lock().fail_outbound = fail;
    }

    /// Toggle inbound failure injection.
    pub fn set_fail_inbound(&self, fail: bool) {
        self.book.lock().fail_inbound = fail;
    }
}

impl ValueLedger for InMemoryLedger {
    fn transfer_in_native(&self, from: &AccountId, amount: Amount) -> Result<Amount, VaultError> {
        let mut book = self.book.lock();
        if book.fail_inbound {
            return Err(VaultError::TransferFailed("inbound rejected".to_string()));
        }
        let balance = book.native.entry(*from).or_insert(0);
        if *balance < amount {
            return Err(VaultError::TransferFailed(format!(
                "insufficient native balance: {balance} < {amount}"
            )));
        }
        *balance -= amount;
        book.custody_native = book.custody_native.saturating_add(amount);
        Ok(amount)
    }

    fn transfer_out_native(&self, to: &AccountId, amount: Amount) -> Result<(), VaultError> {
        let mut book = self.book.lock();
        if book.fail_outbound {
            return Err(VaultError::TransferFailed("outbound rejected".to_string()));
        }
        if book.custody_native < amount {
            return Err(VaultError::TransferFailed(format!(
                "insufficient custody: {} < {amount}",
                book.custody_native
            )));
        }
        book.custody_native -= amount;
        let balance = book.native.entry(*to).or_insert(0);
        *balance = balance.saturating_add(amount);
        Ok(())
    }

    fn transfer_in_unit(
        &self,
        unit: &UnitType,
        from: &AccountId,
        amount: Amount,
    ) -> Result<Amount, VaultError> {
        let mut book = self.book.lock();
        if book.fail_inbound {
            return Err(VaultError::TransferFailed("inbound rejected".to_string()));
        }
        let balance = book.units.entry((*unit, *from)).or_insert(0);
        if *balance < amount {
            return Err(VaultError::TransferFailed(format!(
                "insufficient unit balance: {balance} < {amount}"
            )));
        }
        *balance -= amount;
        // Fee-on-transfer units deliver less than the sender parted with.
        let haircut = book.haircut_bps.get(unit).copied().unwrap_or(0);
        let received =
            amount - (u128::from(amount) * u128::from(haircut) / u128::from(BPS_DENOMINATOR)) as Amount;
        let custody = book.custody_units.entry(*unit).or_insert(0);
        *custody = custody.saturating_add(received);
        Ok(received)
    }

    fn transfer_out_unit(
        &self,
        unit: &UnitType,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), VaultError> {
        let mut book = self.book.lock();
        if book.fail_outbound {
            return Err(VaultError::TransferFailed("outbound rejected".to_string()));
        }
        let custody = book.custody_units.entry(*unit).or_insert(0);
        if *custody < amount {
            return Err(VaultError::TransferFailed(format!(
                "insufficient custody: {custody} < {amount}"
            )));
        }
        *custody -= amount;
        let balance = book.units.entry((*unit, *to)).or_insert(0);
        *balance = balance.saturating_add(amount);
        Ok(())
    }
}
