//! Task store use-case service.
//!
//! # Responsibility
//! - Own the authoritative in-memory task list, filter and selection.
//! - Persist the full list through `TaskRepository` after every mutation.
//! - Answer filtered and aggregate queries for the view layer.
//!
//! # Invariants
//! - Task ids are unique within the store at any instant.
//! - New tasks are prepended; relative order is otherwise never changed.
//! - `create`, `delete`, `toggle_completion` and `clear_completed` write the
//!   whole list exactly once, even when the target id is missing.
//! - `select`, `set_filter` and queries never write.
//! - A failed write is reported but the in-memory change is kept.
//! - Selection is validated lazily: a stale id is kept until consumed.

use crate::model::filter::TaskFilter;
use crate::model::task::{Task, TaskId, TaskStats, TaskValidationError};
use crate::repo::task_repo::{RepoError, TaskRepository};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, TaskStoreError>;

/// Failure of a single store operation.
///
/// Every variant is terminal to the triggering call only.
#[derive(Debug)]
pub enum TaskStoreError {
    /// Input rejected; nothing changed and nothing was written.
    Validation(TaskValidationError),
    /// A selection-based action ran with nothing selected.
    NoSelection,
    /// The write failed after the in-memory change was applied.
    Persistence(RepoError),
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoSelection => write!(f, "no task selected"),
            Self::Persistence(err) => write!(f, "tasks may not survive a reload: {err}"),
        }
    }
}

impl Error for TaskStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NoSelection => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskStoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TaskStoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// In-memory task list mirrored to a repository.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    filter: TaskFilter,
    selected: Option<TaskId>,
    durable: bool,
}

impl<R: TaskRepository> TaskStore<R> {
    /// Builds a store from whatever the repository holds.
    ///
    /// Absent or unreadable data yields an empty store, never an error.
    pub fn load(repo: R) -> Self {
        let tasks = repo.load_tasks();
        info!(
            "event=store_load module=store status=ok count={}",
            tasks.len()
        );
        Self {
            repo,
            tasks,
            filter: TaskFilter::default(),
            selected: None,
            durable: true,
        }
    }

    /// Creates a task from raw input and prepends it.
    ///
    /// # Errors
    /// - `Validation` when `text` is blank; the store is untouched.
    /// - `Persistence` when the write fails; the task stays in memory.
    pub fn create(&mut self, text: &str) -> StoreResult<Task> {
        let mut task = Task::new(text).map_err(|err| {
            debug!("event=task_create module=store status=rejected reason=empty_text");
            TaskStoreError::from(err)
        })?;
        while self.position(&task.id).is_some() {
            task.id = TaskId::generate();
        }

        self.tasks.insert(0, task.clone());
        debug!(
            "event=task_create module=store status=ok total={}",
            self.tasks.len()
        );
        self.persist("task_create")?;
        Ok(task)
    }

    /// Removes the task with `id`, if present.
    ///
    /// Clears the selection when it points at `id`.
    pub fn delete(&mut self, id: &TaskId) -> StoreResult<()> {
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.id != id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        debug!(
            "event=task_delete module=store status=ok removed={}",
            before - self.tasks.len()
        );
        self.persist("task_delete")
    }

    /// Flips completion of the task with `id`, if present.
    pub fn toggle_completion(&mut self, id: &TaskId) -> StoreResult<()> {
        match self.position(id) {
            Some(index) => {
                let task = &mut self.tasks[index];
                task.toggle();
                debug!(
                    "event=task_toggle module=store status=ok completed={}",
                    task.completed
                );
            }
            None => debug!("event=task_toggle module=store status=miss"),
        }
        self.persist("task_toggle")
    }

    /// Removes every completed task and returns how many were removed.
    ///
    /// Clears the selection when the selected task was among them.
    pub fn clear_completed(&mut self) -> StoreResult<usize> {
        if self.selected_task().is_some_and(|task| task.completed) {
            self.selected = None;
        }

        let before = self.tasks.len();
        self.tasks.retain(Task::is_active);
        let removed = before - self.tasks.len();
        debug!("event=tasks_clear_completed module=store status=ok removed={removed}");
        self.persist("tasks_clear_completed")?;
        Ok(removed)
    }

    /// Selects `id` without checking that it exists.
    pub fn select(&mut self, id: TaskId) {
        self.selected = Some(id);
    }

    /// Toggles the selected task, then clears the selection.
    ///
    /// The selection is cleared even when the write fails.
    ///
    /// # Errors
    /// - `NoSelection` when nothing is selected; nothing is written.
    pub fn complete_selected(&mut self) -> StoreResult<()> {
        let id = self.selected.take().ok_or_else(|| {
            debug!("event=task_complete_selected module=store status=rejected reason=no_selection");
            TaskStoreError::NoSelection
        })?;
        self.toggle_completion(&id)
    }

    /// Deletes the selected task.
    ///
    /// # Errors
    /// - `NoSelection` when nothing is selected; nothing is written.
    pub fn delete_selected(&mut self) -> StoreResult<()> {
        let id = self.selected.clone().ok_or_else(|| {
            debug!("event=task_delete_selected module=store status=rejected reason=no_selection");
            TaskStoreError::NoSelection
        })?;
        self.delete(&id)
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    /// Tasks matching the current filter, in store order.
    ///
    /// Each call returns a fresh iterator.
    pub fn filtered_view(&self) -> impl Iterator<Item = &Task> + '_ {
        let filter = self.filter;
        self.tasks.iter().filter(move |task| filter.matches(task))
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// All tasks, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn selected_id(&self) -> Option<&TaskId> {
        self.selected.as_ref()
    }

    /// Resolves the selection; `None` when nothing is selected or the id is stale.
    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Whether the last write succeeded.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    fn persist(&mut self, event: &'static str) -> StoreResult<()> {
        match self.repo.save_tasks(&self.tasks) {
            Ok(()) => {
                if !self.durable {
                    info!("event={event} module=store status=recovered");
                }
                self.durable = true;
                Ok(())
            }
            Err(err) => {
                error!(
                    "event={event} module=store status=error error_code=persist_failed count={} error={err}",
                    self.tasks.len()
                );
                if self.durable {
                    warn!("event={event} module=store status=degraded durable=false");
                }
                self.durable = false;
                Err(err.into())
            }
        }
    }
}
