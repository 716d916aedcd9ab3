//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, repository and FFI.
//! - Enforce text/id validation at the creation boundary.
//!
//! # Invariants
//! - `id` is stable and never reused for another task in the same store.
//! - `text` is trimmed and non-empty for every task built by `Task::new`.
//! - Stored text is not re-validated on load; creation is the only text gate.
//!   Records with blank ids are dropped by the repository on load.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Display format of `created_at`, e.g. `10/19/2026, 3:04:05 PM`.
pub const CREATED_AT_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Opaque task identifier.
///
/// Freshly created tasks get UUID v4 strings. Identifiers loaded from storage
/// are accepted as-is, so older millisecond-timestamp ids keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier, rejecting blank input.
    pub fn parse(value: impl Into<String>) -> Result<Self, TaskValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validation errors raised when building a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text was empty or whitespace-only after trimming.
    EmptyText,
    /// Identifier was empty or whitespace-only.
    EmptyId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text cannot be empty"),
            Self::EmptyId => write!(f, "task id cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do item.
///
/// Serialized with camelCase field names (`createdAt`) to match the stored
/// record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Locale-style display timestamp. Not sortable.
    #[serde(default)]
    pub created_at: String,
}

impl Task {
    /// Creates an open task stamped with the current local time.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank after trimming.
    pub fn new(text: &str) -> Result<Self, TaskValidationError> {
        Self::with_parts(TaskId::generate(), text, now_display())
    }

    /// Creates an open task from caller-provided identity and timestamp.
    ///
    /// Used by import paths and tests that need deterministic values.
    pub fn with_parts(
        id: TaskId,
        text: &str,
        created_at: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskValidationError::EmptyText);
        }

        Ok(Self {
            id,
            text: text.to_string(),
            completed: false,
            created_at: created_at.into(),
        })
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Aggregate counts over a task sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskStats {
    /// Counts tasks; `active` is derived as `total - completed`.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (total, completed) = tasks
            .into_iter()
            .fold((0, 0), |(total, completed), task| {
                (total + 1, completed + usize::from(task.completed))
            });

        Self {
            total,
            active: total - completed,
            completed,
        }
    }
}

fn now_display() -> String {
    Local::now().format(CREATED_AT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskId, TaskStats, TaskValidationError};

    #[test]
    fn new_trims_text_and_starts_open() {
        let task = Task::new("  buy milk \n").expect("text is not blank");
        assert_eq!(task.text, "buy milk");
        assert!(!task.completed);
        assert!(!task.created_at.is_empty());
    }

    #[test]
    fn new_rejects_whitespace_text() {
        assert_eq!(Task::new(" \t ").unwrap_err(), TaskValidationError::EmptyText);
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(TaskId::generate(), TaskId::generate());
    }

    #[test]
    fn stats_derive_active_from_total() {
        let mut done = Task::new("done").unwrap();
        done.toggle();
        let open = Task::new("open").unwrap();

        let stats = TaskStats::from_tasks([&done, &open]);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.active, 1);
    }
}
