//! Todo construction from raw user input.

use crate::model::todo::{parse_deadline, Todo, TodoId, TodoValidationError};
use uuid::Uuid;

/// Validating constructor for new todo records.
pub struct TodoFactory;

impl TodoFactory {
    /// Creates a todo with a generated UUID v4 id.
    ///
    /// # Contract
    /// - Pure: no storage access.
    /// - Returned todo has `completed=false` and `disabled=false`.
    ///
    /// # Errors
    /// - Returns `TodoValidationError` when any field is empty, a text field
    ///   is too long, or `deadline` does not parse as a date.
    pub fn create(
        title: &str,
        description: &str,
        deadline: &str,
    ) -> Result<Todo, TodoValidationError> {
        Self::create_with_id(Uuid::new_v4().to_string(), title, description, deadline)
    }

    /// Creates a todo with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn create_with_id(
        id: impl Into<TodoId>,
        title: &str,
        description: &str,
        deadline: &str,
    ) -> Result<Todo, TodoValidationError> {
        let todo = Todo {
            id: id.into(),
            title: title.to_string(),
            description: description.to_string(),
            deadline: parse_deadline(deadline)?,
            disabled: false,
            completed: false,
        };
        todo.validate()?;
        Ok(todo)
    }
}
