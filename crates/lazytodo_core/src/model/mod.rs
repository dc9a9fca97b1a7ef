//! Todo domain model and construction.
//!
//! # Responsibility
//! - Define the canonical todo record and its state machine.
//! - Validate user input before any record exists.
//!
//! # Invariants
//! - Every todo is identified by a stable, non-empty `TodoId`.
//! - Removal is a hard delete from the collection; there are no tombstones.

pub mod factory;
pub mod todo;
