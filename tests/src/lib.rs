//! # Quantum-Vault Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Shared fixtures (accounts, funded vaults, tracing)
//! └── integration/      # End-to-end scenarios
//!     ├── lifecycle.rs  # Create / deposit / cancel / control transfer
//!     ├── resolution.rs # All collapse mechanisms + conservation
//!     ├── entanglement.rs # Linking, cascades, symmetry
//!     └── claims.rs     # Entitlement withdrawal semantics
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qv-tests
//!
//! # By category
//! cargo test -p qv-tests integration::resolution::
//! ```

#![allow(dead_code)]

pub mod integration;
pub mod support;
