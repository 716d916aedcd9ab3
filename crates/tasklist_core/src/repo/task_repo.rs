//! Task repository contract and key-value implementation.
//!
//! # Responsibility
//! - Expose the narrow `load`/`save` seam the task store persists through.
//! - Own the stored record layout: one JSON array under a fixed key.
//!
//! # Invariants
//! - Loading never fails: absent, unreadable or unparseable values yield an
//!   empty sequence.
//! - Saving always serializes the whole sequence; subsets are never written.
//! - Loaded sequences contain each id at most once (first occurrence wins)
//!   and never a blank id.

use crate::config::DEFAULT_STORAGE_KEY;
use crate::model::task::Task;
use crate::storage::{KeyValueStorage, StorageError};
use log::{debug, error, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure while persisting the task sequence.
#[derive(Debug)]
pub enum RepoError {
    Serialize(serde_json::Error),
    Storage(StorageError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to serialize tasks: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Persistence seam for the task store.
pub trait TaskRepository {
    /// Restores the stored sequence, or an empty one when nothing usable is stored.
    fn load_tasks(&self) -> Vec<Task>;
    /// Overwrites the stored sequence with `tasks`.
    fn save_tasks(&mut self, tasks: &[Task]) -> RepoResult<()>;
}

/// Repository storing tasks as a JSON array under one storage key.
#[derive(Debug)]
pub struct KvTaskRepository<S: KeyValueStorage> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> KvTaskRepository<S> {
    /// Uses the default `tasks` key.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl<S: KeyValueStorage> TaskRepository for KvTaskRepository<S> {
    fn load_tasks(&self) -> Vec<Task> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=tasks_load module=repo status=empty reason=absent");
                return Vec::new();
            }
            Err(err) => {
                error!(
                    "event=tasks_load module=repo status=error error_code=storage_read_failed error={err}"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                let tasks = repair_loaded(tasks);
                debug!(
                    "event=tasks_load module=repo status=ok count={}",
                    tasks.len()
                );
                tasks
            }
            Err(err) => {
                // Value content is never logged; it holds user text.
                warn!(
                    "event=tasks_load module=repo status=empty reason=unparseable bytes={} error={err}",
                    raw.len()
                );
                Vec::new()
            }
        }
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> RepoResult<()> {
        let payload = serde_json::to_string(tasks)?;
        self.storage.set_item(&self.key, &payload)?;
        debug!(
            "event=tasks_save module=repo status=ok count={} bytes={}",
            tasks.len(),
            payload.len()
        );
        Ok(())
    }
}

/// Drops records that cannot be addressed by id: blank ids and repeats.
fn repair_loaded(tasks: Vec<Task>) -> Vec<Task> {
    let before = tasks.len();
    let addressable: Vec<Task> = tasks
        .into_iter()
        .filter(|task| !task.id.as_str().trim().is_empty())
        .collect();
    let blank = before - addressable.len();

    let mut seen = HashSet::with_capacity(addressable.len());
    let unique: Vec<Task> = addressable
        .into_iter()
        .filter(|task| seen.insert(task.id.clone()))
        .collect();
    let duplicates = before - blank - unique.len();

    if blank > 0 || duplicates > 0 {
        warn!(
            "event=tasks_load module=repo status=repaired dropped_blank_ids={blank} dropped_duplicates={duplicates}"
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::{KvTaskRepository, TaskRepository};
    use crate::storage::{KeyValueStorage, MemoryKeyValueStorage};

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let mut storage = MemoryKeyValueStorage::new();
        storage
            .set_item(
                "tasks",
                r#"[{"id":"1","text":"first","completed":false,"createdAt":"x"},
                    {"id":"1","text":"second","completed":true,"createdAt":"y"}]"#,
            )
            .unwrap();

        let tasks = KvTaskRepository::new(storage).load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "first");
    }

    #[test]
    fn blank_ids_are_dropped_on_load() {
        let mut storage = MemoryKeyValueStorage::new();
        storage
            .set_item(
                "tasks",
                r#"[{"id":"","text":"orphan","completed":false,"createdAt":"x"},
                    {"id":"   ","text":"spaces","completed":true,"createdAt":"x"},
                    {"id":"7","text":"kept","completed":false,"createdAt":"y"}]"#,
            )
            .unwrap();

        let tasks = KvTaskRepository::new(storage).load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id.as_str(), "7");
    }

    #[test]
    fn custom_key_is_used_for_reads_and_writes() {
        let mut repo = KvTaskRepository::with_key(MemoryKeyValueStorage::new(), "other");
        repo.save_tasks(&[]).unwrap();
        assert_eq!(repo.key(), "other");
        assert!(repo.storage().get_item("tasks").unwrap().is_none());
        assert_eq!(
            repo.storage().get_item("other").unwrap().as_deref(),
            Some("[]")
        );
    }
}
