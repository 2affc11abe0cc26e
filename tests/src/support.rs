//! Shared fixtures for the integration suite.

use qv_state_vault::prelude::*;
use std::sync::Once;

/// Creator of most test states.
pub const ALICE: AccountId = [0xA1u8; 20];
/// Counterparty / controller hand-off target.
pub const BOB: AccountId = [0xB0u8; 20];
/// Uninvolved third party.
pub const CAROL: AccountId = [0xC0u8; 20];
/// Matches the default fallback recipient in [`VaultConfig`].
pub const TREASURY: AccountId = [0xFEu8; 20];

/// Plain unit type.
pub const UNIT_X: UnitType = [0xAAu8; 20];
/// Second unit type, for ordering checks.
pub const UNIT_Y: UnitType = [0xBBu8; 20];

/// Starting ledger balance per account and asset.
pub const STARTING_BALANCE: Amount = 1_000_000;

static INIT: Once = Once::new();

/// Install a test subscriber once per process; `RUST_LOG` controls output.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Default test configuration: the documented distribution rules plus a
/// non-zero resolution fee so fee-paid manual resolution is reachable.
pub fn test_config() -> VaultConfig {
    VaultConfig {
        resolution_fee: 25,
        ..VaultConfig::default()
    }
}

/// Vault over an [`InMemoryLedger`] with funded test accounts and a
/// deterministic entropy provider.
pub fn funded_vault() -> StateVaultService<InMemoryLedger> {
    init_tracing();
    let ledger = InMemoryLedger::new();
    for account in [ALICE, BOB, CAROL] {
        ledger.set_native_balance(account, STARTING_BALANCE);
        ledger.set_unit_balance(UNIT_X, account, STARTING_BALANCE);
        ledger.set_unit_balance(UNIT_Y, account, STARTING_BALANCE);
    }
    StateVaultService::new(ledger, test_config())
        .expect("test config is valid")
        .with_entropy(HashEntropy::new())
}

/// Create a state with the given mechanism and outcome set.
pub fn create_state(
    vault: &StateVaultService<InMemoryLedger>,
    creator: &AccountId,
    mechanism: CollapseMechanism,
    outcomes: Vec<OutcomeIndex>,
    expiry: u64,
    now: u64,
) -> StateId {
    vault
        .create(
            creator,
            CreateStateRequest {
                expiry,
                condition_payload: b"test-condition".to_vec(),
                potential_outcomes: outcomes,
                mechanism,
            },
            now,
        )
        .expect("state creation succeeds")
}

/// Assert the full invariant sweep passes.
pub fn assert_invariants(vault: &StateVaultService<InMemoryLedger>) {
    let report = vault.check_invariants();
    assert!(report.is_ok(), "invariant violations: {:?}", report.violations);
}

/// Sum of claimable balances across the known test recipients.
pub fn total_claimable(
    vault: &StateVaultService<InMemoryLedger>,
    id: &StateId,
    asset: &AssetKind,
) -> Amount {
    [ALICE, BOB, CAROL, TREASURY]
        .iter()
        .map(|recipient| vault.claimable(id, recipient, asset).unwrap_or(0))
        .sum()
}
