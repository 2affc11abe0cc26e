//! # Algorithms Module
//!
//! Pure algorithmic core: state-id derivation, per-mechanism outcome
//! selection, and entitlement share arithmetic.

pub mod distribution;
pub mod resolution;
pub mod state_id;

pub use distribution::{compute_payouts, Payout};
pub use resolution::{select_default, select_forced, select_manual, select_probabilistic};
pub use state_id::derive_state_id;
