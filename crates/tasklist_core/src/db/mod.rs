//! SQLite bootstrap for the durable key-value backend.
//!
//! # Responsibility
//! - Open file or in-memory connections ready for `kv_entries` access.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Failures surface as `StorageError`, the same error the backend reports.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
