//! Core use-case services.
//!
//! # Responsibility
//! - Turn UI gestures into explicit board and grid commands.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod day_progress;
pub mod drag;
pub mod goal_grid_service;
pub mod priority_board;
