//! Domain model for the priority board and goal grid.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the static layout tables (quadrant bijection, sync map, palette)
//!   next to the types they constrain.
//!
//! # Invariants
//! - Every task item is identified by a stable `TaskItemId`.
//! - Quadrant membership is derived from priority, never stored.
//! - Goal grid cells are only mutable through the grid service.

pub mod goal_grid;
pub mod palette;
pub mod quadrant;
pub mod task_item;
