//! Todo use-case service.
//!
//! # Responsibility
//! - Provide the entry points a front end calls for user actions.
//! - Turn silent store no-ops into typed errors for interactive callers.
//!
//! # Invariants
//! - Service APIs never bypass store validation/persistence contracts.
//! - Disabled todos cannot be edited, toggled, or removed.

use crate::clock::Clock;
use crate::model::factory::TodoFactory;
use crate::model::todo::{parse_deadline, PatchRejection, Todo, TodoPatch, TodoValidationError};
use crate::repo::kv_repo::KeyValueStore;
use crate::repo::todo_store::{StoreError, TodoStore, UpdateOutcome};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    Validation(TodoValidationError),
    NotFound(String),
    Disabled(String),
    DeadlinePassed(String),
    Store(StoreError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid todo: {err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Disabled(id) => write!(f, "todo is disabled: {id}"),
            Self::DeadlinePassed(id) => {
                write!(f, "todo deadline has passed, cannot mark completed: {id}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for TodoServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type TodoServiceResult<T> = Result<T, TodoServiceError>;

/// Todo service facade over a `TodoStore`.
pub struct TodoService<S: KeyValueStore, C: Clock> {
    store: TodoStore<S, C>,
}

impl<S: KeyValueStore, C: Clock> TodoService<S, C> {
    pub fn new(store: TodoStore<S, C>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TodoStore<S, C> {
        &self.store
    }

    /// Creates and persists a new todo from form input.
    pub fn add(
        &self,
        title: &str,
        description: &str,
        deadline: &str,
    ) -> TodoServiceResult<Todo> {
        let todo = TodoFactory::create(title, description, deadline)?;
        self.store.append(todo.clone())?;
        info!("event=todo_add module=service status=ok id={}", todo.id);
        Ok(todo)
    }

    /// Replaces title, description and deadline of an active todo.
    ///
    /// # Errors
    /// - `NotFound` / `Disabled` take precedence over input validation.
    pub fn edit(
        &self,
        id: &str,
        title: &str,
        description: &str,
        deadline: &str,
    ) -> TodoServiceResult<Todo> {
        let current = self.require(id)?;
        if current.disabled {
            return Err(TodoServiceError::Disabled(id.to_string()));
        }
        let patch = TodoPatch::fields(title, description, parse_deadline(deadline)?);
        let todo = self.apply(id, &patch)?;
        info!("event=todo_edit module=service status=ok id={id}");
        Ok(todo)
    }

    /// Flips `completed`.
    ///
    /// # Errors
    /// - `DeadlinePassed` when marking an expired todo complete.
    pub fn toggle_completed(&self, id: &str) -> TodoServiceResult<Todo> {
        let current = self.require(id)?;
        let todo = self.apply(id, &TodoPatch::completed(!current.completed))?;
        info!(
            "event=todo_toggle module=service status=ok id={id} completed={}",
            todo.completed
        );
        Ok(todo)
    }

    /// Disables a todo permanently. Idempotent.
    pub fn disable(&self, id: &str) -> TodoServiceResult<Todo> {
        let todo = self.apply(id, &TodoPatch::disable())?;
        info!("event=todo_disable module=service status=ok id={id}");
        Ok(todo)
    }

    /// Deletes an active todo.
    pub fn remove(&self, id: &str) -> TodoServiceResult<()> {
        let current = self.require(id)?;
        if current.disabled {
            return Err(TodoServiceError::Disabled(id.to_string()));
        }
        self.store.remove(id)?;
        info!("event=todo_remove module=service status=ok id={id}");
        Ok(())
    }

    pub fn get(&self, id: &str) -> TodoServiceResult<Option<Todo>> {
        Ok(self.store.get(id)?)
    }

    pub fn list(&self) -> TodoServiceResult<Vec<Todo>> {
        Ok(self.store.load_all()?)
    }

    /// Returns true when the list is non-empty and every todo is completed.
    pub fn all_completed(&self) -> TodoServiceResult<bool> {
        let todos = self.store.load_all()?;
        Ok(!todos.is_empty() && todos.iter().all(|todo| todo.completed))
    }

    /// Returns whether `todo`'s deadline has passed according to the clock.
    pub fn is_expired(&self, todo: &Todo) -> bool {
        todo.is_deadline_passed(self.store.clock().now())
    }

    fn require(&self, id: &str) -> TodoServiceResult<Todo> {
        self.store
            .get(id)?
            .ok_or_else(|| TodoServiceError::NotFound(id.to_string()))
    }

    fn apply(&self, id: &str, patch: &TodoPatch) -> TodoServiceResult<Todo> {
        match self.store.update(id, patch)? {
            UpdateOutcome::Updated(todo) => Ok(todo),
            UpdateOutcome::NotFound => Err(TodoServiceError::NotFound(id.to_string())),
            UpdateOutcome::Rejected(PatchRejection::Disabled) => {
                Err(TodoServiceError::Disabled(id.to_string()))
            }
            UpdateOutcome::Rejected(PatchRejection::DeadlinePassed) => {
                Err(TodoServiceError::DeadlinePassed(id.to_string()))
            }
            UpdateOutcome::Rejected(PatchRejection::Invalid(err)) => {
                Err(TodoServiceError::Validation(err))
            }
        }
    }
}
