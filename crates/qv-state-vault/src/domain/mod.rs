//! # Domain Module
//!
//! Core domain types for the state vault: value objects, the custody
//! entity, the arena and entitlement book, errors, and invariants.

pub mod arena;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use arena::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
