//! Core domain logic for the task list.
//! This crate is the single source of truth for task store invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::{default_log_level, LoggingConfig, StoreConfig, DEFAULT_STORAGE_KEY};
pub use logging::{init_logging, init_logging_from_str, logging_status};
pub use model::filter::{ParseFilterError, TaskFilter};
pub use model::task::{Task, TaskId, TaskStats, TaskValidationError};
pub use repo::task_repo::{KvTaskRepository, RepoError, RepoResult, TaskRepository};
pub use service::task_store::{StoreResult, TaskStore, TaskStoreError};
pub use storage::{
    KeyValueStorage, MemoryKeyValueStorage, SqliteKeyValueStorage, StorageError, StorageResult,
};

/// Task store persisted to the SQLite key-value backend.
pub type SqliteTaskStore = TaskStore<KvTaskRepository<SqliteKeyValueStorage>>;

/// Opens the durable store described by `config`.
///
/// # Errors
/// - Returns `StorageError::Sqlite` when the database cannot be opened.
/// - Returns `StorageError::UnsupportedSchemaVersion` when the file was written
///   by a newer build.
pub fn open_store(config: &StoreConfig) -> StorageResult<SqliteTaskStore> {
    let storage = SqliteKeyValueStorage::open(&config.db_path)?;
    let repo = KvTaskRepository::with_key(storage, config.storage_key.as_str());
    Ok(TaskStore::load(repo))
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
