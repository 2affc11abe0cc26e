//! # State Id Derivation
//!
//! Collision-resistant state identifiers derived from the creator identity,
//! a monotonically increasing sequence number, the creation clock reading,
//! and the caller-supplied condition payload.

use crate::domain::{AccountId, StateId};
use sha2::{Digest, Sha256};

/// Domain-separation prefix for id derivation.
const ID_DOMAIN: &[u8] = b"qv-state-vault/state-id/v1";

/// Derive a state id.
///
/// The sequence number is owned by the service book and passed in
/// explicitly; there is no hidden process-wide counter.
#[must_use]
pub fn derive_state_id(
    creator: &AccountId,
    sequence: u64,
    created_at: u64,
    payload: &[u8],
) -> StateId {
    let mut hasher = Sha256::new();
    hasher.update(ID_DOMAIN);
    hasher.update(creator);
    hasher.update(sequence.to_be_bytes());
    hasher.update(created_at.to_be_bytes());
    hasher.update(payload);
    let digest = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(&digest);
    id
}
