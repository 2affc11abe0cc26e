//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the outbound ports usable by hosts and tests.

mod entropy;
mod memory_ledger;

pub use entropy::HashEntropy;
pub use memory_ledger::InMemoryLedger;
