//! Todo collection persistence over a key-value store.
//!
//! # Responsibility
//! - Own the single serialized todo collection under one storage key.
//! - Provide load/save/append/update/remove by id.
//! - Notify subscribers after every successful save.
//!
//! # Invariants
//! - Every mutation is read-whole / mutate / write-whole; last writer wins.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `update`/`remove` on an unknown id never signal an error.

use crate::clock::{Clock, SystemClock};
use crate::model::todo::{PatchRejection, Todo, TodoPatch, TodoValidationError};
use crate::repo::kv_repo::{KeyValueStore, KvError};
use log::{debug, warn};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "todos";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for todo collection persistence.
#[derive(Debug)]
pub enum StoreError {
    Kv(KvError),
    /// Stored content is present but is not a valid todo array.
    CorruptState(String),
    /// A record handed to a write violates field invariants; nothing was written.
    Invalid {
        index: usize,
        source: TodoValidationError,
    },
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(err) => write!(f, "{err}"),
            Self::CorruptState(message) => write!(f, "corrupt todo collection: {message}"),
            Self::Invalid { index, source } => {
                write!(f, "refusing to save invalid record {index}: {source}")
            }
            Self::Encode(err) => write!(f, "failed to encode todo collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::CorruptState(_) => None,
            Self::Invalid { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Result of `TodoStore::update`. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Patch applied and saved; carries the record as persisted.
    Updated(Todo),
    /// No record with the requested id.
    NotFound,
    /// Patch refused; the collection was not written.
    Rejected(PatchRejection),
}

type Listener = Box<dyn Fn(&[Todo])>;

/// Persistence facade for the todo collection.
pub struct TodoStore<S: KeyValueStore, C: Clock = SystemClock> {
    kv: S,
    clock: C,
    key: String,
    listeners: RefCell<Vec<Listener>>,
}

impl<S: KeyValueStore> TodoStore<S> {
    /// Creates a store on `kv` under `DEFAULT_STORAGE_KEY` with the wall clock.
    pub fn new(kv: S) -> Self {
        Self::with_clock(kv, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> TodoStore<S, C> {
    pub fn with_clock(kv: S, clock: C) -> Self {
        Self {
            kv,
            clock,
            key: DEFAULT_STORAGE_KEY.to_string(),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Overrides the storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Registers a listener called with the full collection after each save.
    ///
    /// Listeners must not subscribe from inside a notification.
    pub fn subscribe(&self, listener: impl Fn(&[Todo]) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    /// Loads the whole collection.
    ///
    /// # Errors
    /// - `CorruptState` when the stored value is not a JSON todo array or a
    ///   record violates field invariants.
    pub fn load_all(&self) -> StoreResult<Vec<Todo>> {
        let raw = match self.kv.get(&self.key)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Vec::new()),
        };

        let todos: Vec<Todo> = serde_json::from_str(&raw).map_err(|err| {
            warn!(
                "event=todo_load module=store status=error error_code=corrupt_state key={}",
                self.key
            );
            StoreError::CorruptState(err.to_string())
        })?;

        for (index, todo) in todos.iter().enumerate() {
            todo.validate().map_err(|err| {
                warn!(
                    "event=todo_load module=store status=error error_code=invalid_record key={} index={index}",
                    self.key
                );
                StoreError::CorruptState(format!("record {index}: {err}"))
            })?;
        }

        Ok(todos)
    }

    /// Serializes and overwrites the collection in one write.
    ///
    /// # Errors
    /// - `Invalid` when any record fails `Todo::validate`; storage is untouched.
    pub fn save_all(&self, todos: &[Todo]) -> StoreResult<()> {
        for (index, todo) in todos.iter().enumerate() {
            todo.validate().map_err(|source| {
                warn!(
                    "event=todo_save module=store status=error error_code=invalid_record key={} index={index}",
                    self.key
                );
                StoreError::Invalid { index, source }
            })?;
        }

        let encoded = serde_json::to_string(todos).map_err(StoreError::Encode)?;
        self.kv.set(&self.key, &encoded)?;
        debug!(
            "event=todo_save module=store status=ok key={} count={}",
            self.key,
            todos.len()
        );

        for listener in self.listeners.borrow().iter() {
            listener(todos);
        }
        Ok(())
    }

    /// Appends `todo` after existing records. Ids are not re-checked.
    pub fn append(&self, todo: Todo) -> StoreResult<()> {
        let mut todos = self.load_all()?;
        todos.push(todo);
        self.save_all(&todos)
    }

    /// Finds one record by id.
    pub fn get(&self, id: &str) -> StoreResult<Option<Todo>> {
        Ok(self.load_all()?.into_iter().find(|todo| todo.id == id))
    }

    /// Applies `patch` to the record with `id`.
    ///
    /// Saves only when the patch was applied.
    pub fn update(&self, id: &str, patch: &TodoPatch) -> StoreResult<UpdateOutcome> {
        let mut todos = self.load_all()?;
        let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) else {
            debug!("event=todo_update module=store status=skip reason=not_found id={id}");
            return Ok(UpdateOutcome::NotFound);
        };

        if let Err(rejection) = todo.apply_patch(patch, self.clock.now()) {
            debug!(
                "event=todo_update module=store status=skip reason=rejected id={id} detail={rejection}"
            );
            return Ok(UpdateOutcome::Rejected(rejection));
        }

        let updated = todo.clone();
        self.save_all(&todos)?;
        Ok(UpdateOutcome::Updated(updated))
    }

    /// Removes the record with `id`, keeping the order of the others.
    ///
    /// Returns whether a record was removed. The remainder is saved either way.
    pub fn remove(&self, id: &str) -> StoreResult<bool> {
        let mut todos = self.load_all()?;
        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        let removed = todos.len() != before;
        self.save_all(&todos)?;
        Ok(removed)
    }
}
