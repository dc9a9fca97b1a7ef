//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the injected key-value storage contract and its backends.
//! - Persist the todo collection as one serialized value.
//!
//! # Invariants
//! - Store writes validate records through the model before persistence.
//! - Store reads return `CorruptState` for unparseable content.

pub mod kv_repo;
pub mod todo_store;
