//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model rules and repository writes into store operations.
//! - Keep FFI/CLI layers decoupled from storage details.

pub mod task_store;
