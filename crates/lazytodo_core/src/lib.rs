//! Core domain logic for LazyTodo.
//! This crate is the single source of truth for todo invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::factory::TodoFactory;
pub use model::todo::{
    parse_deadline, PatchRejection, Todo, TodoId, TodoPatch, TodoState, TodoValidationError,
    MAX_TEXT_CHARS,
};
pub use repo::kv_repo::{
    KeyValueStore, KvError, KvResult, MemoryKeyValueStore, SqliteKeyValueStore,
};
pub use repo::todo_store::{
    StoreError, StoreResult, TodoStore, UpdateOutcome, DEFAULT_STORAGE_KEY,
};
pub use service::todo_service::{TodoService, TodoServiceError, TodoServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
