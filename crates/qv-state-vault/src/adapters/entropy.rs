//! # Hash Entropy Adapter
//!
//! Deterministic entropy provider: SHA-256 over a fixed salt and the
//! caller-supplied seed, truncated to a u64. Deterministic by design so
//! hosts can audit a probabilistic resolution after the fact; a production
//! deployment would swap in a verifiable-randomness collaborator behind
//! the same port.

use crate::domain::VaultError;
use crate::ports::outbound::EntropyProvider;
use sha2::{Digest, Sha256};

/// SHA-256 based entropy provider.
#[derive(Clone, Debug, Default)]
pub struct HashEntropy {
    salt: [u8; 32],
}

impl HashEntropy {
    /// Create a provider with a zero salt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with an explicit salt.
    #[must_use]
    pub fn with_salt(salt: [u8; 32]) -> Self {
        Self { salt }
    }
}

impl EntropyProvider for HashEntropy {
    fn entropy(&self, seed: &[u8]) -> Result<u64, VaultError> {
        let mut hasher = Sha256::new();
        hasher.update(self.salt);
        hasher.update(seed);
        let digest = hasher.finalize();
        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);
        Ok(u64::from_be_bytes(word))
    }
}
