//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Map core board and grid results into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens the store, applies one command, and persists before
//!   returning; no board or grid state lives in this crate between calls.
//! - IDs cross the boundary as hyphenated UUID strings.

use log::warn;
use planboard_core::db::open_db;
use planboard_core::{
    core_version as core_version_inner, day_progress as day_progress_inner,
    init_logging as init_logging_inner, ping as ping_inner, resolve_color, BoardChange,
    BoardView, GoalGrid, GoalGridView, GridLayout, GridRepository, PaletteColor, Priority,
    PriorityBoard, SiblingRect, SqliteGridRepository, SqliteTaskStore, TaskItem, TaskStore,
    CELL_COUNT,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const PLANBOARD_DB_FILE_NAME: &str = "planboard.sqlite3";
static PLANBOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

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
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One task as shown inside a quadrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTaskItem {
    pub item_id: String,
    pub text: String,
    /// Priority value in `1..=4`.
    pub priority: u8,
}

/// One quadrant in layout order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardQuadrant {
    /// UI quadrant id in `1..=4`.
    pub quadrant_id: u8,
    pub priority: u8,
    pub items: Vec<BoardTaskItem>,
}

/// Named palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardPaletteColor {
    pub name: String,
    pub color_value: String,
}

/// Full board snapshot envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshotResponse {
    pub ok: bool,
    pub quadrants: Vec<BoardQuadrant>,
    pub palette: Vec<BoardPaletteColor>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

impl BoardSnapshotResponse {
    fn from_view(view: BoardView) -> Self {
        Self {
            ok: true,
            quadrants: view
                .quadrants
                .into_iter()
                .map(|quadrant| BoardQuadrant {
                    quadrant_id: quadrant.quadrant.id(),
                    priority: quadrant.priority.value(),
                    items: quadrant.items.into_iter().map(to_board_task_item).collect(),
                })
                .collect(),
            palette: view
                .color_palette
                .into_iter()
                .map(|color| BoardPaletteColor {
                    name: color.name,
                    color_value: color.color_value,
                })
                .collect(),
            message: "Board loaded.".to_string(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            ok: false,
            quadrants: Vec::new(),
            palette: Vec::new(),
            message,
        }
    }
}

/// Generic board command envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    pub ok: bool,
    /// Item the command targeted, when known.
    pub item_id: Option<String>,
    pub priority_changed: bool,
    pub reordered: bool,
    pub message: String,
}

impl BoardActionResponse {
    fn changed(item_id: Option<String>, change: BoardChange) -> Self {
        let message = if change.is_noop() {
            "No change."
        } else {
            "Board updated."
        };
        Self {
            ok: true,
            item_id,
            priority_changed: change.priority_changed,
            reordered: change.reordered,
            message: message.to_string(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            ok: false,
            item_id: None,
            priority_changed: false,
            reordered: false,
            message,
        }
    }
}

/// Vertical geometry of one rendered sibling at drop time.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSibling {
    pub item_id: String,
    pub top: f64,
    pub height: f64,
}

/// Loads the board grouped by quadrant.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn board_snapshot() -> BoardSnapshotResponse {
    match with_board(|board| board.render()) {
        Ok(view) => BoardSnapshotResponse::from_view(view),
        Err(err) => BoardSnapshotResponse::failure(report_failure("board_snapshot", err)),
    }
}

/// Appends a task to the end of the global sequence.
///
/// `priority` must be in `1..=4`; blank text is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn board_add_task(text: String, priority: u8) -> BoardActionResponse {
    let text = text.trim().to_string();
    if text.is_empty() {
        return BoardActionResponse::failure("board_add_task failed: text is empty".to_string());
    }
    let Some(priority) = Priority::from_value(priority) else {
        return BoardActionResponse::failure(format!(
            "board_add_task failed: priority {priority} is outside 1..=4"
        ));
    };

    let item = TaskItem::new(text, priority);
    let result = with_conn(|conn| {
        let mut store = SqliteTaskStore::try_new(conn).map_err(|err| err.to_string())?;
        store.add_item(item).map_err(|err| err.to_string())
    });
    match result {
        Ok(item_id) => BoardActionResponse {
            ok: true,
            item_id: Some(item_id.to_string()),
            priority_changed: false,
            reordered: false,
            message: "Task added.".to_string(),
        },
        Err(err) => BoardActionResponse::failure(report_failure("board_add_task", err)),
    }
}

/// Removes one task. Unknown ids report `ok` with "No change.".
#[flutter_rust_bridge::frb(sync)]
pub fn board_remove_task(item_id: String) -> BoardActionResponse {
    let result = parse_id(&item_id, "item_id").and_then(|id| {
        with_conn(|conn| {
            let mut store = SqliteTaskStore::try_new(conn).map_err(|err| err.to_string())?;
            store.remove_item(id).map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(removed) => {
            let mut response = BoardActionResponse::changed(Some(item_id), BoardChange::NONE);
            if removed {
                response.message = "Task removed.".to_string();
            }
            response
        }
        Err(err) => BoardActionResponse::failure(report_failure("board_remove_task", err)),
    }
}

/// Moves a task into quadrant `quadrant_id` without changing its position.
#[flutter_rust_bridge::frb(sync)]
pub fn board_move_to_quadrant(item_id: String, quadrant_id: u8) -> BoardActionResponse {
    let result = parse_id(&item_id, "item_id")
        .and_then(|id| with_board(|board| board.move_to_quadrant(id, quadrant_id)));
    match result {
        Ok(change) => BoardActionResponse::changed(Some(item_id), change),
        Err(err) => BoardActionResponse::failure(report_failure("board_move_to_quadrant", err)),
    }
}

/// Applies a new visual order to quadrant `quadrant_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_reorder_within_quadrant(
    quadrant_id: u8,
    item_ids: Vec<String>,
) -> BoardActionResponse {
    let result = item_ids
        .iter()
        .map(|raw| parse_id(raw, "item_ids"))
        .collect::<Result<Vec<_>, _>>()
        .and_then(|ids| with_board(|board| board.reorder_within_quadrant(quadrant_id, &ids)));
    match result {
        Ok(change) => BoardActionResponse::changed(None, change),
        Err(err) => {
            BoardActionResponse::failure(report_failure("board_reorder_within_quadrant", err))
        }
    }
}

/// Completes a drag gesture in one call.
///
/// `siblings` and `pointer_y` describe the last dragover inside the target
/// quadrant; pass `None` when the pointer never moved over it.
#[flutter_rust_bridge::frb(sync)]
pub fn board_drop(
    item_id: String,
    quadrant_id: u8,
    siblings: Vec<DragSibling>,
    pointer_y: Option<f64>,
) -> BoardActionResponse {
    let result = parse_id(&item_id, "item_id").and_then(|id| {
        let rects = siblings
            .iter()
            .map(|sibling| {
                Ok(SiblingRect {
                    id: parse_id(&sibling.item_id, "siblings")?,
                    top: sibling.top,
                    height: sibling.height,
                })
            })
            .collect::<Result<Vec<_>, String>>()?;
        with_board(|board| {
            let Some(mut session) = board.begin_drag(id)? else {
                return Ok(BoardChange::NONE);
            };
            if let Some(pointer_y) = pointer_y {
                session.drag_over(quadrant_id, &rects, pointer_y);
            }
            board.drop_drag(session, quadrant_id)
        })
    });
    match result {
        Ok(change) => BoardActionResponse::changed(Some(item_id), change),
        Err(err) => BoardActionResponse::failure(report_failure("board_drop", err)),
    }
}

/// One rendered goal grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCellItem {
    pub index: u32,
    /// Stable element id (`cell-<index>`).
    pub element_id: String,
    pub content: String,
    pub is_completed: bool,
    pub is_highlighted: bool,
    pub is_title: bool,
    /// Mirror cells refuse edits.
    pub is_read_only: bool,
    pub background: String,
    pub text_color: String,
}

/// Goal grid render envelope returned by every grid command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRenderResponse {
    pub ok: bool,
    pub grid_id: Option<String>,
    pub name: String,
    pub completed_count: u32,
    /// All 81 cells in row-major order; empty on failure.
    pub cells: Vec<GridCellItem>,
    pub message: String,
}

impl GridRenderResponse {
    fn success(message: impl Into<String>, view: &mut GoalGridView<'_>) -> Self {
        let cells = view
            .render()
            .into_iter()
            .map(|cell| GridCellItem {
                index: cell.index as u32,
                element_id: cell.element_id,
                content: cell.content,
                is_completed: cell.is_completed,
                is_highlighted: cell.is_highlighted,
                is_title: cell.is_title,
                is_read_only: cell.is_read_only,
                background: cell.background,
                text_color: cell.text_color,
            })
            .collect();
        let grid = view.grid();
        Self {
            ok: true,
            grid_id: Some(grid.id().to_string()),
            name: grid.name().to_string(),
            completed_count: grid.completed_count() as u32,
            cells,
            message: message.into(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            ok: false,
            grid_id: None,
            name: String::new(),
            completed_count: 0,
            cells: Vec::new(),
            message,
        }
    }
}

/// Grid listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSummaryItem {
    pub grid_id: String,
    pub name: String,
    pub completed_count: u32,
}

/// Grid listing envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridListResponse {
    pub ok: bool,
    pub items: Vec<GridSummaryItem>,
    pub message: String,
}

/// Creates a new goal grid and returns its first render.
///
/// A non-blank `name` is written into the title cell.
#[flutter_rust_bridge::frb(sync)]
pub fn grid_create(name: Option<String>) -> GridRenderResponse {
    let result = with_conn(|conn| {
        let repo = SqliteGridRepository::try_new(conn).map_err(|err| err.to_string())?;
        let mut grid = GoalGrid::new();
        let response = {
            let mut view = GoalGridView::mount(&mut grid, GridLayout::standard());
            if let Some(name) = name.as_deref().map(str::trim).filter(|name| !name.is_empty()) {
                view.edit_cell_at(planboard_core::TITLE_CELL_INDEX, name);
            }
            GridRenderResponse::success("Goal grid created.", &mut view)
        };
        repo.create_grid(&grid).map_err(|err| err.to_string())?;
        Ok(response)
    });
    result.unwrap_or_else(|err| GridRenderResponse::failure(report_failure("grid_create", err)))
}

/// Lists stored goal grids, oldest first.
#[flutter_rust_bridge::frb(sync)]
pub fn grid_list() -> GridListResponse {
    let result = with_conn(|conn| {
        let repo = SqliteGridRepository::try_new(conn).map_err(|err| err.to_string())?;
        repo.list_grids().map_err(|err| err.to_string())
    });
    match result {
        Ok(summaries) => GridListResponse {
            ok: true,
            message: format!("Found {} grid(s).", summaries.len()),
            items: summaries
                .into_iter()
                .map(|summary| GridSummaryItem {
                    grid_id: summary.grid_id.to_string(),
                    name: summary.display_name,
                    completed_count: summary.completed_count as u32,
                })
                .collect(),
        },
        Err(err) => GridListResponse {
            ok: false,
            items: Vec::new(),
            message: report_failure("grid_list", err),
        },
    }
}

/// Deletes one goal grid. Unknown ids fail.
#[flutter_rust_bridge::frb(sync)]
pub fn grid_delete(grid_id: String) -> GridListResponse {
    let result = parse_id(&grid_id, "grid_id").and_then(|id| {
        with_conn(|conn| {
            let repo = SqliteGridRepository::try_new(conn).map_err(|err| err.to_string())?;
            if !repo.delete_grid(id).map_err(|err| err.to_string())? {
                return Err(format!("goal grid not found: {id}"));
            }
            repo.list_grids().map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(summaries) => GridListResponse {
            ok: true,
            message: "Goal grid deleted.".to_string(),
            items: summaries
                .into_iter()
                .map(|summary| GridSummaryItem {
                    grid_id: summary.grid_id.to_string(),
                    name: summary.display_name,
                    completed_count: summary.completed_count as u32,
                })
                .collect(),
        },
        Err(err) => GridListResponse {
            ok: false,
            items: Vec::new(),
            message: report_failure("grid_delete", err),
        },
    }
}

/// Mounts a stored grid and returns its render. Diverged mirrors are
/// repaired and persisted.
#[flutter_rust_bridge::frb(sync)]
pub fn grid_render(grid_id: String) -> GridRenderResponse {
    grid_command(&grid_id, "grid_render", |_| "Goal grid loaded.".to_string())
}

/// Edits one cell. Mirror cells ignore the edit and report it.
#[flutter_rust_bridge::frb(sync)]
pub fn grid_edit_cell(grid_id: String, cell_index: u32, text: String) -> GridRenderResponse {
    grid_command(&grid_id, "grid_edit_cell", |view| {
        match view.edit_cell_at(cell_index as usize, text) {
            Some(outcome) if outcome.renamed => "Goal grid renamed.".to_string(),
            Some(_) => "Cell updated.".to_string(),
            None => format!("Cell {cell_index} is read-only; edit ignored."),
        }
    })
}

/// Flips the completed flag of one cell.
#[flutter_rust_bridge::frb(sync)]
pub fn grid_toggle_completed(grid_id: String, cell_index: u32) -> GridRenderResponse {
    grid_command(&grid_id, "grid_toggle_completed", |view| {
        toggle_message(view.toggle_completed(cell_index as usize), cell_index)
    })
}

/// Flips the highlighted flag of one cell.
#[flutter_rust_bridge::frb(sync)]
pub fn grid_toggle_highlighted(grid_id: String, cell_index: u32) -> GridRenderResponse {
    grid_command(&grid_id, "grid_toggle_highlighted", |view| {
        toggle_message(view.toggle_highlighted(cell_index as usize), cell_index)
    })
}

/// Sets a cell color override from a palette name or hex literal.
///
/// `None` or blank `color` clears the override.
#[flutter_rust_bridge::frb(sync)]
pub fn grid_set_color(grid_id: String, cell_index: u32, color: Option<String>) -> GridRenderResponse {
    let requested = color
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let resolved = match requested {
        None => None,
        Some(value) => match load_palette().map(|palette| resolve_color(&palette, value)) {
            Ok(Some(resolved)) => Some(resolved),
            Ok(None) => {
                return GridRenderResponse::failure(report_failure(
                    "grid_set_color",
                    format!("unknown color `{value}`"),
                ))
            }
            Err(err) => return GridRenderResponse::failure(report_failure("grid_set_color", err)),
        },
    };

    grid_command(&grid_id, "grid_set_color", |view| {
        let index = cell_index as usize;
        if view.set_color(index, resolved.as_deref()) {
            "Color updated.".to_string()
        } else if index >= CELL_COUNT {
            format!("Cell {cell_index} is out of range; color ignored.")
        } else {
            format!(
                "Color `{}` was rejected for cell {cell_index}; color ignored.",
                resolved.as_deref().unwrap_or_default()
            )
        }
    })
}

/// Day progress bar state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayProgressResponse {
    pub percent: f64,
    pub remaining_seconds: u32,
}

/// Computes day progress from local seconds since midnight.
#[flutter_rust_bridge::frb(sync)]
pub fn day_progress(seconds_since_midnight: u32) -> DayProgressResponse {
    let progress = day_progress_inner(seconds_since_midnight);
    DayProgressResponse {
        percent: progress.percent,
        remaining_seconds: progress.remaining_seconds,
    }
}

fn resolve_planboard_db_path() -> PathBuf {
    PLANBOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("PLANBOARD_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(PLANBOARD_DB_FILE_NAME)
        })
        .clone()
}

fn with_conn<T>(f: impl FnOnce(&Connection) -> Result<T, String>) -> Result<T, String> {
    let db_path = resolve_planboard_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("planboard DB open failed: {err}"))?;
    f(&conn)
}

fn with_board<T>(
    f: impl FnOnce(
        &mut PriorityBoard<SqliteTaskStore<'_>>,
    ) -> planboard_core::BoardResult<T>,
) -> Result<T, String> {
    with_conn(|conn| {
        let store = SqliteTaskStore::try_new(conn)
            .map_err(|err| format!("task store init failed: {err}"))?;
        let mut board = PriorityBoard::init(store);
        f(&mut board).map_err(|err| err.to_string())
    })
}

fn load_palette() -> Result<Vec<PaletteColor>, String> {
    with_conn(|conn| {
        let store = SqliteTaskStore::try_new(conn)
            .map_err(|err| format!("task store init failed: {err}"))?;
        store
            .get_state()
            .map(|state| state.color_palette)
            .map_err(|err| err.to_string())
    })
}

/// Loads, mounts, mutates and saves one grid.
fn grid_command(
    grid_id: &str,
    action: &'static str,
    f: impl FnOnce(&mut GoalGridView<'_>) -> String,
) -> GridRenderResponse {
    let result = parse_id(grid_id, "grid_id").and_then(|id| {
        with_conn(|conn| {
            let repo = SqliteGridRepository::try_new(conn)
                .map_err(|err| format!("grid repo init failed: {err}"))?;
            let mut grid = repo
                .load_grid(id)
                .map_err(|err| err.to_string())?
                .ok_or_else(|| format!("goal grid not found: {id}"))?;
            let response = {
                let mut view = GoalGridView::mount(&mut grid, GridLayout::standard());
                let message = f(&mut view);
                GridRenderResponse::success(message, &mut view)
            };
            repo.save_grid(&grid).map_err(|err| err.to_string())?;
            Ok(response)
        })
    });
    result.unwrap_or_else(|err| GridRenderResponse::failure(report_failure(action, err)))
}

fn toggle_message(value: Option<bool>, cell_index: u32) -> String {
    match value {
        Some(true) => "Cell flag set.".to_string(),
        Some(false) => "Cell flag cleared.".to_string(),
        None => format!("Cell {cell_index} is out of range; toggle ignored."),
    }
}

fn parse_id(raw: &str, field: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid {field} `{raw}`"))
}

fn report_failure(action: &'static str, err: String) -> String {
    warn!("event=ffi_call module=ffi status=error action={action}");
    format!("{action} failed: {err}")
}

fn to_board_task_item(item: TaskItem) -> BoardTaskItem {
    BoardTaskItem {
        item_id: item.id.to_string(),
        text: item.text,
        priority: item.priority.value(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        board_add_task, board_drop, board_move_to_quadrant, board_remove_task,
        board_reorder_within_quadrant, board_snapshot, core_version, day_progress, grid_create,
        grid_delete, grid_edit_cell, grid_list, grid_render, grid_set_color,
        grid_toggle_completed, init_logging, ping, BoardSnapshotResponse, DragSibling,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn board_add_rejects_invalid_input() {
        assert!(!board_add_task("   ".to_string(), 1).ok);
        let response = board_add_task("valid".to_string(), 5);
        assert!(!response.ok);
        assert!(response.message.contains("priority"));
    }

    #[test]
    fn board_move_changes_quadrant_in_snapshot() {
        let text = unique_token("board-move");
        let added = board_add_task(text.clone(), 1);
        assert!(added.ok, "{}", added.message);
        let item_id = added.item_id.expect("add should return item_id");

        let moved = board_move_to_quadrant(item_id.clone(), 2);
        assert!(moved.ok, "{}", moved.message);
        assert!(moved.priority_changed);

        let snapshot = board_snapshot();
        assert!(snapshot.ok, "{}", snapshot.message);
        assert_eq!(quadrant_of(&snapshot, &item_id), Some(2));
        let item = snapshot.quadrants[1]
            .items
            .iter()
            .find(|item| item.item_id == item_id)
            .expect("moved item should be listed");
        assert_eq!(item.priority, 3);
        assert_eq!(item.text, text);

        let again = board_move_to_quadrant(item_id.clone(), 2);
        assert!(again.ok);
        assert!(!again.priority_changed);

        assert!(board_remove_task(item_id.clone()).ok);
        assert_eq!(quadrant_of(&board_snapshot(), &item_id), None);
    }

    #[test]
    fn board_reorder_swaps_relative_order() {
        let first = board_add_task(unique_token("reorder-a"), 2).item_id.unwrap();
        let second = board_add_task(unique_token("reorder-b"), 2).item_id.unwrap();

        let response = board_reorder_within_quadrant(4, vec![second.clone(), first.clone()]);
        assert!(response.ok, "{}", response.message);

        let snapshot = board_snapshot();
        let ids: Vec<&str> = snapshot.quadrants[3]
            .items
            .iter()
            .map(|item| item.item_id.as_str())
            .collect();
        let second_pos = ids.iter().position(|id| *id == second).unwrap();
        let first_pos = ids.iter().position(|id| *id == first).unwrap();
        assert!(second_pos < first_pos);
    }

    #[test]
    fn board_reorder_rejects_malformed_ids() {
        let response = board_reorder_within_quadrant(1, vec!["not-a-uuid".to_string()]);
        assert!(!response.ok);
        assert!(response.message.contains("item_ids"));
    }

    #[test]
    fn board_drop_moves_item_before_pointer_target() {
        let anchor = board_add_task(unique_token("drop-anchor"), 3).item_id.unwrap();
        let dragged = board_add_task(unique_token("drop-dragged"), 1).item_id.unwrap();

        let siblings = vec![DragSibling {
            item_id: anchor.clone(),
            top: 0.0,
            height: 40.0,
        }];
        let response = board_drop(dragged.clone(), 2, siblings, Some(5.0));
        assert!(response.ok, "{}", response.message);
        assert!(response.priority_changed);
        assert!(response.reordered);

        let snapshot = board_snapshot();
        let ids: Vec<&str> = snapshot.quadrants[1]
            .items
            .iter()
            .map(|item| item.item_id.as_str())
            .collect();
        let dragged_pos = ids.iter().position(|id| *id == dragged).unwrap();
        let anchor_pos = ids.iter().position(|id| *id == anchor).unwrap();
        assert_eq!(dragged_pos + 1, anchor_pos);
    }

    #[test]
    fn grid_edit_mirrors_topic_and_refuses_mirror() {
        let created = grid_create(Some("Year plan".to_string()));
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.name, "Year plan");
        assert_eq!(created.cells.len(), 81);
        let grid_id = created.grid_id.expect("create should return grid_id");

        let edited = grid_edit_cell(grid_id.clone(), 30, "Health".to_string());
        assert!(edited.ok, "{}", edited.message);
        assert_eq!(edited.cells[10].content, "Health");
        assert!(edited.cells[10].is_read_only);

        let refused = grid_edit_cell(grid_id.clone(), 10, "nope".to_string());
        assert!(refused.ok);
        assert!(refused.message.contains("read-only"));

        let rendered = grid_render(grid_id.clone());
        assert_eq!(rendered.cells[10].content, "Health");
        assert_eq!(rendered.cells[30].content, "Health");
    }

    #[test]
    fn grid_completion_and_colors_persist() {
        let grid_id = grid_create(None).grid_id.unwrap();

        let colored = grid_set_color(grid_id.clone(), 0, Some("Lavender".to_string()));
        assert!(colored.ok, "{}", colored.message);
        assert_eq!(colored.cells[0].background, "#bdb2ff");

        let unknown = grid_set_color(grid_id.clone(), 0, Some("plaid".to_string()));
        assert!(!unknown.ok);

        let outside = grid_set_color(grid_id.clone(), 200, Some("#abc".to_string()));
        assert!(outside.ok, "{}", outside.message);
        assert!(outside.message.contains("out of range"), "{}", outside.message);
        assert_eq!(outside.cells[0].background, "#bdb2ff");

        let completed = grid_toggle_completed(grid_id.clone(), 0);
        assert_eq!(completed.completed_count, 1);
        assert_eq!(completed.cells[0].background, "#ffadad");

        let listed = grid_list();
        assert!(listed
            .items
            .iter()
            .any(|item| item.grid_id == grid_id && item.completed_count == 1));

        let deleted = grid_delete(grid_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(!grid_render(grid_id.clone()).ok);
        assert!(!grid_delete(grid_id).ok);
    }

    #[test]
    fn day_progress_reports_half_day() {
        let progress = day_progress(43_200);
        assert_eq!(progress.percent, 50.0);
        assert_eq!(progress.remaining_seconds, 43_200);
    }

    fn quadrant_of(snapshot: &BoardSnapshotResponse, item_id: &str) -> Option<u8> {
        snapshot
            .quadrants
            .iter()
            .find(|quadrant| quadrant.items.iter().any(|item| item.item_id == item_id))
            .map(|quadrant| quadrant.quadrant_id)
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
