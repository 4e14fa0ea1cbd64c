//! Store and repository layer.
//!
//! # Responsibility
//! - Define the external state container contract (`TaskStore`).
//! - Isolate SQLite query details from board/grid orchestration.
//!
//! # Invariants
//! - Stores expose snapshots; callers never hold references into them.
//! - SQLite implementations verify schema readiness at construction.

pub mod grid_repo;
pub mod task_repo;
pub mod task_store;
