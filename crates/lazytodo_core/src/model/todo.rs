//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted in the todo collection.
//! - Own field validation and the completed/disabled state machine.
//!
//! # Invariants
//! - `id` is stable and never reused for another todo.
//! - `disabled` is a one-way flag; a disabled todo rejects every change.
//! - An expired todo can be unmarked but never marked completed.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a todo record.
///
/// Kept as a string because persisted collections may carry ids minted
/// outside this crate.
pub type TodoId = String;

/// Maximum length (in chars) of `title` and `description`.
pub const MAX_TEXT_CHARS: usize = 100;

const DEADLINE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Field-level validation failures for todo input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyId,
    EmptyTitle,
    EmptyDescription,
    EmptyDeadline,
    TextTooLong { field: &'static str, max_chars: usize },
    InvalidDeadline(String),
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "todo id must not be empty"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::EmptyDeadline => write!(f, "deadline must not be empty"),
            Self::TextTooLong { field, max_chars } => {
                write!(f, "{field} exceeds {max_chars} characters")
            }
            Self::InvalidDeadline(value) => {
                write!(f, "deadline `{value}` is not a valid date (expected YYYY-MM-DD)")
            }
        }
    }
}

impl Error for TodoValidationError {}

/// Derived lifecycle state of one todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoState {
    /// Initial state.
    ActiveIncomplete,
    ActiveCompleted,
    /// Terminal; no outgoing transitions.
    Disabled,
}

/// Reason a patch was refused. Nothing is changed when a patch is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchRejection {
    /// Target is disabled and frozen.
    Disabled,
    /// Marking complete after the deadline has passed.
    DeadlinePassed,
    /// Patched fields would violate field invariants.
    Invalid(TodoValidationError),
}

impl Display for PatchRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "todo is disabled"),
            Self::DeadlinePassed => write!(f, "todo deadline has passed"),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PatchRejection {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

/// Canonical todo record.
///
/// Field order matches the persisted JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    /// Serialized as `YYYY-MM-DD`.
    pub deadline: NaiveDate,
    pub disabled: bool,
    pub completed: bool,
}

impl Todo {
    /// Checks field invariants (non-empty id/text, text length).
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.id.trim().is_empty() {
            return Err(TodoValidationError::EmptyId);
        }
        validate_text("title", &self.title, TodoValidationError::EmptyTitle)?;
        validate_text(
            "description",
            &self.description,
            TodoValidationError::EmptyDescription,
        )?;
        Ok(())
    }

    pub fn state(&self) -> TodoState {
        if self.disabled {
            TodoState::Disabled
        } else if self.completed {
            TodoState::ActiveCompleted
        } else {
            TodoState::ActiveIncomplete
        }
    }

    /// Returns whether `now` is past the start of the deadline day.
    ///
    /// A todo is already expired during its deadline day.
    pub fn is_deadline_passed(&self, now: NaiveDateTime) -> bool {
        self.deadline
            .and_hms_opt(0, 0, 0)
            .is_some_and(|day_start| now > day_start)
    }

    /// Applies `patch` all-or-nothing.
    ///
    /// # Invariants
    /// - Disabled todos accept only a patch that re-asserts `disabled=true`.
    /// - `completed` may go false -> true only before the (patched) deadline.
    /// - On `Err`, `self` is left untouched.
    pub fn apply_patch(
        &mut self,
        patch: &TodoPatch,
        now: NaiveDateTime,
    ) -> Result<(), PatchRejection> {
        if self.disabled {
            return if patch.is_disable_only() || patch.is_empty() {
                Ok(())
            } else {
                Err(PatchRejection::Disabled)
            };
        }

        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.clone();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(deadline) = patch.deadline {
            next.deadline = deadline;
        }
        if let Some(completed) = patch.completed {
            if completed && !next.completed && next.is_deadline_passed(now) {
                return Err(PatchRejection::DeadlinePassed);
            }
            next.completed = completed;
        }
        if let Some(disabled) = patch.disabled {
            next.disabled = disabled;
        }

        next.validate().map_err(PatchRejection::Invalid)?;
        *self = next;
        Ok(())
    }
}

/// Partial update for one todo. `None` fields are left as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub disabled: Option<bool>,
}

impl TodoPatch {
    /// Replaces the three editable text/date fields.
    pub fn fields(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            deadline: Some(deadline),
            ..Self::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn disable() -> Self {
        Self {
            disabled: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn is_disable_only(&self) -> bool {
        self == &Self::disable()
    }
}

/// Parses user deadline input.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its calendar date is kept).
pub fn parse_deadline(value: &str) -> Result<NaiveDate, TodoValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TodoValidationError::EmptyDeadline);
    }

    let parsed = if ISO_DATE_RE.is_match(trimmed) {
        NaiveDate::parse_from_str(trimmed, DEADLINE_FORMAT).ok()
    } else {
        DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .map(|timestamp| timestamp.date_naive())
    };

    parsed.ok_or_else(|| TodoValidationError::InvalidDeadline(trimmed.to_string()))
}

fn validate_text(
    field: &'static str,
    value: &str,
    empty_error: TodoValidationError,
) -> Result<(), TodoValidationError> {
    if value.trim().is_empty() {
        return Err(empty_error);
    }
    if value.chars().count() > MAX_TEXT_CHARS {
        return Err(TodoValidationError::TextTooLong {
            field,
            max_chars: MAX_TEXT_CHARS,
        });
    }
    Ok(())
}
