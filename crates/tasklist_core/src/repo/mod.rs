//! Repository layer between the task store and key-value storage.
//!
//! # Responsibility
//! - Define the load/save contract used by the store.
//! - Keep the stored record layout out of store logic.
//!
//! # Invariants
//! - Read failures degrade to an empty sequence; write failures surface as
//!   `RepoError`.

pub mod task_repo;
