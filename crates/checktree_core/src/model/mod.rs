//! Checkbox tree data model.
//!
//! # Responsibility
//! - Define the tri-state status and the node shape shared by every engine pass.
//! - Own the arena that stores one heading's checkbox forest.
//!
//! # Invariants
//! - A forest is rebuilt from document text on every engine invocation and
//!   never outlives it.
//! - Node ids are arena indices and are only meaningful for the forest that
//!   produced them.

pub mod checkbox;
pub mod forest;
