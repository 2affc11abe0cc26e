//! # Entitlement Distribution
//!
//! Pure share arithmetic converting drained custody into per-recipient
//! payouts. Fractional amounts truncate down and every truncation remainder
//! is routed to the fallback recipient, so the sum of payouts per asset
//! always equals the balance held at the moment of collapse.

use crate::domain::{
    AccountId, Amount, AssetKind, CustodySnapshot, DistributionPolicy, OutcomeIndex, Share,
    ShareRecipient, BPS_DENOMINATOR,
};

/// One computed payout, ready to credit into the entitlement book.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payout {
    /// Recipient account.
    pub recipient: AccountId,
    /// Asset being distributed.
    pub asset: AssetKind,
    /// Amount owed.
    pub amount: Amount,
}

/// Compute payouts for a resolved state.
///
/// A pure function of `(chosen outcome, creator, controller)` plus the
/// configured policy. Assets are processed native-first, then each
/// deposited unit type in deposit order; outcomes with no rule route the
/// full balance to the fallback recipient.
#[must_use]
pub fn compute_payouts(
    custody: &CustodySnapshot,
    outcome: OutcomeIndex,
    creator: &AccountId,
    controller: &AccountId,
    policy: &DistributionPolicy,
    fallback: &AccountId,
) -> Vec<Payout> {
    let shares = policy.rule_for(outcome).unwrap_or(&[]);
    let mut payouts = Vec::new();

    if custody.native > 0 {
        split_asset(
            custody.native,
            AssetKind::Native,
            shares,
            creator,
            controller,
            fallback,
            &mut payouts,
        );
    }
    for (unit, amount) in &custody.units {
        if *amount > 0 {
            split_asset(
                *amount,
                AssetKind::Unit(*unit),
                shares,
                creator,
                controller,
                fallback,
                &mut payouts,
            );
        }
    }

    payouts
}

/// Split one asset balance across the shares, remainder to fallback.
fn split_asset(
    balance: Amount,
    asset: AssetKind,
    shares: &[Share],
    creator: &AccountId,
    controller: &AccountId,
    fallback: &AccountId,
    payouts: &mut Vec<Payout>,
) {
    let mut distributed: Amount = 0;
    for share in shares {
        // u128 intermediate: balance * bps would overflow u64.
        let amount = (u128::from(balance) * u128::from(share.bps) / u128::from(BPS_DENOMINATOR))
            as Amount;
        let recipient = resolve_recipient(&share.recipient, creator, controller, fallback);
        push_payout(payouts, recipient, asset, amount);
        distributed = distributed.saturating_add(amount);
    }
    let remainder = balance.saturating_sub(distributed);
    push_payout(payouts, *fallback, asset, remainder);
}

/// Resolve a share role against the collapsing state.
fn resolve_recipient(
    recipient: &ShareRecipient,
    creator: &AccountId,
    controller: &AccountId,
    fallback: &AccountId,
) -> AccountId {
    match recipient {
        ShareRecipient::Creator => *creator,
        ShareRecipient::Controller => *controller,
        ShareRecipient::Fallback => *fallback,
        ShareRecipient::Account(account) => *account,
    }
}

/// Append a payout, merging with an existing (recipient, asset) entry.
fn push_payout(payouts: &mut Vec<Payout>, recipient: AccountId, asset: AssetKind, amount: Amount) {
    if amount == 0 {
        return;
    }
    if let Some(existing) = payouts
        .iter_mut()
        .find(|p| p.recipient == recipient && p.asset == asset)
    {
        existing.amount = existing.amount.saturating_add(amount);
    } else {
        payouts.push(Payout {
            recipient,
            asset,
            amount,
        });
    }
}
