//! Core domain logic for the planboard planner.
//! This crate is the single source of truth for board and grid invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::goal_grid::{
    GoalGrid, GoalGridId, GridCell, GridConfigError, GridLayout, CELL_COUNT, GRID_SIDE,
    TITLE_CELL_INDEX,
};
pub use model::palette::{resolve_color, CellPalette, PaletteColor};
pub use model::quadrant::Quadrant;
pub use model::task_item::{Priority, PriorityError, TaskItem, TaskItemId};
pub use repo::grid_repo::{
    GridRepoError, GridRepoResult, GridRepository, GridSummary, SqliteGridRepository,
};
pub use repo::task_repo::SqliteTaskStore;
pub use repo::task_store::{BoardState, InMemoryTaskStore, StoreError, StoreResult, TaskStore};
pub use service::day_progress::{day_progress, DayProgress};
pub use service::drag::{DragSession, InsertionPoint, SiblingRect};
pub use service::goal_grid_service::{
    CellEditOutcome, EditableCell, GoalGridView, GridCollection, RenderedCell,
};
pub use service::priority_board::{
    BoardChange, BoardResult, BoardView, PriorityBoard, QuadrantView,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
