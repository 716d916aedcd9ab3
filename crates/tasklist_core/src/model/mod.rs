//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the task record, its identifier and aggregate counts.
//! - Define the closed completion filter used by views.
//!
//! # Invariants
//! - Every task is identified by a `TaskId` that never changes.
//! - Task text is immutable once created; only `completed` changes.

pub mod filter;
pub mod task;
