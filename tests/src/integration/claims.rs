//! # Claim Scenarios
//!
//! Entitlement withdrawal: idempotence, status gating, and transfer-failure
//! recovery.

#[cfg(test)]
mod tests {
    use crate::support::*;
    use qv_state_vault::prelude::*;

    fn collapsed_state_with_split(vault: &StateVaultService<InMemoryLedger>) -> StateId {
        let id = create_state(vault, &ALICE, CollapseMechanism::Manual, vec![1], 0, 100);
        vault.transfer_control(&ALICE, &id, BOB).unwrap();
        vault.deposit_native(&ALICE, &id, 100).unwrap();
        vault.deposit_unit(&ALICE, &id, UNIT_X, 80).unwrap();
        vault.resolve_manual(&BOB, &id, 1, &[]).unwrap();
        id
    }

    #[test]
    fn test_claim_pays_exactly_once() {
        let vault = funded_vault();
        let id = collapsed_state_with_split(&vault);

        assert_eq!(vault.claim(&BOB, &id, AssetKind::Native).unwrap(), 50);
        assert!(matches!(
            vault.claim(&BOB, &id, AssetKind::Native),
            Err(VaultError::NothingToClaim)
        ));
        assert_eq!(
            vault.ledger().native_balance_of(&BOB),
            STARTING_BALANCE + 50
        );
    }

    #[test]
    fn test_claim_per_asset_kind() {
        let vault = funded_vault();
        let id = collapsed_state_with_split(&vault);

        // Native and unit entitlements are independent claims.
        assert_eq!(vault.claim(&ALICE, &id, AssetKind::Native).unwrap(), 50);
        assert_eq!(
            vault.claim(&ALICE, &id, AssetKind::Unit(UNIT_X)).unwrap(),
            40
        );
        assert_eq!(vault.claim(&BOB, &id, AssetKind::Unit(UNIT_X)).unwrap(), 40);
        assert!(matches!(
            vault.claim(&ALICE, &id, AssetKind::Unit(UNIT_X)),
            Err(VaultError::NothingToClaim)
        ));
    }

    #[test]
    fn test_claim_requires_collapsed_state() {
        let vault = funded_vault();
        let superposed = create_state(&vault, &ALICE, CollapseMechanism::Manual, vec![0], 0, 100);
        assert!(matches!(
            vault.claim(&ALICE, &superposed, AssetKind::Native),
            Err(VaultError::WrongStatus { .. })
        ));

        let cancelled = create_state(&vault, &ALICE, CollapseMechanism::Manual, vec![0], 0, 101);
        vault.cancel(&ALICE, &cancelled).unwrap();
        assert!(matches!(
            vault.claim(&ALICE, &cancelled, AssetKind::Native),
            Err(VaultError::WrongStatus { .. })
        ));
    }

    #[test]
    fn test_claim_by_non_recipient_fails() {
        let vault = funded_vault();
        let id = collapsed_state_with_split(&vault);
        assert!(matches!(
            vault.claim(&CAROL, &id, AssetKind::Native),
            Err(VaultError::NothingToClaim)
        ));
    }

    #[test]
    fn test_claim_for_unknown_state_fails() {
        let vault = funded_vault();
        assert!(matches!(
            vault.claim(&ALICE, &[9u8; 32], AssetKind::Native),
            Err(VaultError::StateNotFound(_))
        ));
    }

    #[test]
    fn test_failed_transfer_restores_entitlement() {
        let vault = funded_vault();
        let id = collapsed_state_with_split(&vault);

        vault.ledger().set_fail_outbound(true);
        assert!(matches!(
            vault.claim(&BOB, &id, AssetKind::Native),
            Err(VaultError::TransferFailed(_))
        ));

        // A failed external transfer never destroys the claim.
        assert_eq!(vault.claimable(&id, &BOB, &AssetKind::Native).unwrap(), 50);
        assert_eq!(vault.ledger().native_balance_of(&BOB), STARTING_BALANCE);
        assert_eq!(vault.stats().transfer_failures, 1);

        vault.ledger().set_fail_outbound(false);
        assert_eq!(vault.claim(&BOB, &id, AssetKind::Native).unwrap(), 50);
        assert_invariants(&vault);
    }

    #[test]
    fn test_claimable_is_side_effect_free() {
        let vault = funded_vault();
        let id = collapsed_state_with_split(&vault);

        assert_eq!(vault.claimable(&id, &BOB, &AssetKind::Native).unwrap(), 50);
        assert_eq!(vault.claimable(&id, &BOB, &AssetKind::Native).unwrap(), 50);
        assert_eq!(vault.claim(&BOB, &id, AssetKind::Native).unwrap(), 50);
        assert_eq!(vault.claimable(&id, &BOB, &AssetKind::Native).unwrap(), 0);
    }

    #[test]
    fn test_treasury_claims_fee_and_remainder() {
        let vault = funded_vault();
        let id = create_state(&vault, &ALICE, CollapseMechanism::Manual, vec![1], 0, 100);
        vault.deposit_native(&ALICE, &id, 101).unwrap();

        // Carol pays the 25 fee; outcome 1 leaves a truncation remainder of 1.
        vault.resolve_manual(&CAROL, &id, 1, &[]).unwrap();
        assert_eq!(
            vault.claimable(&id, &TREASURY, &AssetKind::Native).unwrap(),
            26
        );
        assert_eq!(vault.claim(&TREASURY, &id, AssetKind::Native).unwrap(), 26);
        assert_invariants(&vault);
    }
}
