//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task store operations to the UI host via FRB.
//! - Translate store errors into flat envelopes the UI can branch on.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One store instance per process, opened lazily from `StoreConfig`.
//! - Calls are serialized through a mutex; a poisoned lock is recovered.

use log::warn;
use std::sync::{Mutex, OnceLock, PoisonError};
use tasklist_core::{
    core_version as core_version_inner, init_logging_from_str, open_store, ping as ping_inner,
    SqliteTaskStore, StoreConfig, Task, TaskFilter, TaskId, TaskStoreError,
};

static STORE_CONFIG: OnceLock<StoreConfig> = OnceLock::new();
static STORE: OnceLock<Mutex<Option<SqliteTaskStore>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_from_str(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One task row as shown by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: String,
    /// Whether this row is the current selection.
    pub selected: bool,
}

/// Everything the UI needs to re-render after a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub ok: bool,
    /// Tasks matching the active filter, newest first.
    pub items: Vec<TaskItem>,
    /// All tasks regardless of filter, newest first.
    pub stored_items: Vec<TaskItem>,
    /// Active filter (`all|active|completed`).
    pub filter: String,
    pub selected_id: Option<String>,
    pub total: u32,
    pub active: u32,
    pub completed: u32,
    /// False when the latest write failed; data may not survive a restart.
    pub durable: bool,
    pub message: String,
}

/// Result envelope for mutating calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Affected task id when one is known.
    pub task_id: Option<String>,
    /// `validation|no_selection|persistence|unavailable` on failure.
    pub error_kind: Option<String>,
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: Option<String>) -> Self {
        Self {
            ok: true,
            task_id,
            error_kind: None,
            message: message.into(),
        }
    }

    fn failure(kind: &str, message: impl Into<String>, task_id: Option<String>) -> Self {
        Self {
            ok: false,
            task_id,
            error_kind: Some(kind.to_string()),
            message: message.into(),
        }
    }

    fn from_store_error(op: &str, err: &TaskStoreError, task_id: Option<String>) -> Self {
        let kind = match err {
            TaskStoreError::Validation(_) => "validation",
            TaskStoreError::NoSelection => "no_selection",
            TaskStoreError::Persistence(_) => "persistence",
        };
        Self::failure(kind, format!("{op} failed: {err}"), task_id)
    }
}

/// Creates a task from raw input text.
///
/// # FFI contract
/// - Blank input returns `error_kind = "validation"` and changes nothing.
/// - A failed write returns `error_kind = "persistence"`; the task still
///   exists in memory and its id is returned.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(text: String) -> TaskActionResponse {
    run_action("task_create", |store| match store.create(&text) {
        Ok(task) => TaskActionResponse::success("Task created.", Some(task.id.to_string())),
        Err(err) => {
            let kept_id = match err {
                TaskStoreError::Persistence(_) => {
                    store.tasks().first().map(|task| task.id.to_string())
                }
                _ => None,
            };
            TaskActionResponse::from_store_error("task_create", &err, kept_id)
        }
    })
}

/// Deletes a task by id. Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> TaskActionResponse {
    with_task_id("task_delete", task_id, |store, id| {
        store.delete(id).map(|()| "Task deleted.")
    })
}

/// Flips completion of a task by id. Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(task_id: String) -> TaskActionResponse {
    with_task_id("task_toggle", task_id, |store, id| {
        store.toggle_completion(id).map(|()| "Task toggled.")
    })
}

/// Removes all completed tasks.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_clear_completed() -> TaskActionResponse {
    run_action("tasks_clear_completed", |store| match store.clear_completed() {
        Ok(removed) => TaskActionResponse::success(format!("Removed {removed} task(s)."), None),
        Err(err) => TaskActionResponse::from_store_error("tasks_clear_completed", &err, None),
    })
}

/// Selects a task by id. The id is not checked against the store.
#[flutter_rust_bridge::frb(sync)]
pub fn task_select(task_id: String) -> TaskActionResponse {
    with_task_id("task_select", task_id, |store, id| {
        store.select(id.clone());
        Ok("Task selected.")
    })
}

/// Toggles the selected task and clears the selection.
///
/// Returns `error_kind = "no_selection"` when nothing is selected.
#[flutter_rust_bridge::frb(sync)]
pub fn task_complete_selected() -> TaskActionResponse {
    run_action("task_complete_selected", |store| {
        let selected = store.selected_id().map(TaskId::to_string);
        match store.complete_selected() {
            Ok(()) => TaskActionResponse::success("Selected task toggled.", selected),
            Err(err) => {
                TaskActionResponse::from_store_error("task_complete_selected", &err, selected)
            }
        }
    })
}

/// Deletes the selected task.
///
/// Returns `error_kind = "no_selection"` when nothing is selected.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete_selected() -> TaskActionResponse {
    run_action("task_delete_selected", |store| {
        let selected = store.selected_id().map(TaskId::to_string);
        match store.delete_selected() {
            Ok(()) => TaskActionResponse::success("Selected task deleted.", selected),
            Err(err) => {
                TaskActionResponse::from_store_error("task_delete_selected", &err, selected)
            }
        }
    })
}

/// Sets the view filter (`all|active|completed`, case-insensitive).
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_set_filter(filter: String) -> TaskActionResponse {
    let parsed = match filter.parse::<TaskFilter>() {
        Ok(parsed) => parsed,
        Err(err) => {
            return TaskActionResponse::failure(
                "validation",
                format!("tasks_set_filter failed: {err}"),
                None,
            )
        }
    };
    run_action("tasks_set_filter", |store| {
        store.set_filter(parsed);
        TaskActionResponse::success(format!("Filter set to {parsed}."), None)
    })
}

/// Returns the current filtered view, full list, selection and counts.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_snapshot() -> TaskSnapshot {
    match with_store(|store| {
        let selected = store.selected_id();
        let to_item = |task: &Task| to_task_item(task, selected);
        let stats = store.stats();
        TaskSnapshot {
            ok: true,
            items: store.filtered_view().map(to_item).collect(),
            stored_items: store.tasks().iter().map(to_item).collect(),
            filter: store.filter().to_string(),
            selected_id: selected.map(TaskId::to_string),
            total: clamp_count(stats.total),
            active: clamp_count(stats.active),
            completed: clamp_count(stats.completed),
            durable: store.is_durable(),
            message: if stats.total == 0 {
                "No tasks.".to_string()
            } else {
                format!("{} task(s).", stats.total)
            },
        }
    }) {
        Ok(snapshot) => snapshot,
        Err(message) => TaskSnapshot {
            ok: false,
            items: Vec::new(),
            stored_items: Vec::new(),
            filter: TaskFilter::default().to_string(),
            selected_id: None,
            total: 0,
            active: 0,
            completed: 0,
            durable: false,
            message,
        },
    }
}

fn run_action(
    op: &str,
    f: impl FnOnce(&mut SqliteTaskStore) -> TaskActionResponse,
) -> TaskActionResponse {
    with_store(f).unwrap_or_else(|message| {
        TaskActionResponse::failure("unavailable", format!("{op} failed: {message}"), None)
    })
}

fn with_task_id(
    op: &str,
    raw_id: String,
    f: impl FnOnce(&mut SqliteTaskStore, &TaskId) -> Result<&'static str, TaskStoreError>,
) -> TaskActionResponse {
    let id = match TaskId::parse(raw_id) {
        Ok(id) => id,
        Err(err) => {
            return TaskActionResponse::failure("validation", format!("{op} failed: {err}"), None)
        }
    };
    run_action(op, |store| match f(store, &id) {
        Ok(message) => TaskActionResponse::success(message, Some(id.to_string())),
        Err(err) => TaskActionResponse::from_store_error(op, &err, Some(id.to_string())),
    })
}

fn with_store<T>(f: impl FnOnce(&mut SqliteTaskStore) -> T) -> Result<T, String> {
    let slot = STORE.get_or_init(|| Mutex::new(None));
    let mut guard = slot.lock().unwrap_or_else(|poisoned| {
        warn!("event=ffi_store_lock module=ffi status=recovered reason=poisoned");
        PoisonError::into_inner(poisoned)
    });

    if guard.is_none() {
        let store = open_store(resolve_store_config())
            .map_err(|err| format!("task store open failed: {err}"))?;
        *guard = Some(store);
    }

    match guard.as_mut() {
        Some(store) => Ok(f(store)),
        None => Err("task store unavailable".to_string()),
    }
}

fn resolve_store_config() -> &'static StoreConfig {
    STORE_CONFIG.get_or_init(load_store_config)
}

#[cfg(not(test))]
fn load_store_config() -> StoreConfig {
    StoreConfig::from_env()
}

// Tests mutate the process-wide store, so they never touch the user's file.
#[cfg(test)]
fn load_store_config() -> StoreConfig {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    StoreConfig {
        db_path: std::env::temp_dir().join(format!(
            "tasklist-ffi-test-{}-{nanos}.sqlite3",
            std::process::id()
        )),
        ..StoreConfig::default()
    }
}

fn to_task_item(task: &Task, selected: Option<&TaskId>) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        text: task.text.clone(),
        completed: task.completed,
        created_at: task.created_at.clone(),
        selected: selected == Some(&task.id),
    }
}

fn clamp_count(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
