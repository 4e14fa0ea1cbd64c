//! Goal grid repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist goal grids and their cells with last-write-wins semantics.
//!
//! # Invariants
//! - `save_grid` replaces the whole cell set of one grid in a single
//!   transaction.
//! - Only cells that differ from an empty cell are stored; absent rows load
//!   back as empty cells.
//! - Deleting a grid removes its cells (`ON DELETE CASCADE`).

use crate::db::{ensure_schema_ready, DbError};
use crate::model::goal_grid::{GoalGrid, GoalGridId, GridCell};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type GridRepoResult<T> = Result<T, GridRepoError>;

/// Errors from goal grid persistence.
#[derive(Debug)]
pub enum GridRepoError {
    Db(DbError),
    /// Target grid does not exist.
    NotFound(GoalGridId),
    /// Grid id already exists.
    AlreadyExists(GoalGridId),
    InvalidData(String),
}

impl Display for GridRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "goal grid not found: {id}"),
            Self::AlreadyExists(id) => write!(f, "goal grid already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid goal grid data: {message}"),
        }
    }
}

impl Error for GridRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for GridRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for GridRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Lightweight listing row for grid pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSummary {
    pub grid_id: GoalGridId,
    pub display_name: String,
    pub completed_count: usize,
}

/// Repository interface for goal grid persistence.
pub trait GridRepository {
    /// Stores a new grid with all of its cells.
    fn create_grid(&self, grid: &GoalGrid) -> GridRepoResult<GoalGridId>;
    /// Loads one grid by id.
    fn load_grid(&self, grid_id: GoalGridId) -> GridRepoResult<Option<GoalGrid>>;
    /// Lists grids, oldest first.
    fn list_grids(&self) -> GridRepoResult<Vec<GridSummary>>;
    /// Overwrites name and cells of an existing grid.
    fn save_grid(&self, grid: &GoalGrid) -> GridRepoResult<()>;
    /// Deletes one grid. Returns `false` when the id is unknown.
    fn delete_grid(&self, grid_id: GoalGridId) -> GridRepoResult<bool>;
}

/// SQLite-backed goal grid repository.
pub struct SqliteGridRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGridRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> GridRepoResult<Self> {
        ensure_schema_ready(
            conn,
            &[
                ("goal_grids", &["grid_uuid", "display_name", "created_at"]),
                (
                    "goal_grid_cells",
                    &[
                        "grid_uuid",
                        "cell_index",
                        "content",
                        "is_completed",
                        "is_highlighted",
                        "color",
                    ],
                ),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl GridRepository for SqliteGridRepository<'_> {
    fn create_grid(&self, grid: &GoalGrid) -> GridRepoResult<GoalGridId> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if grid_exists(&tx, grid.id())? {
            return Err(GridRepoError::AlreadyExists(grid.id()));
        }
        tx.execute(
            "INSERT INTO goal_grids (grid_uuid, display_name) VALUES (?1, ?2);",
            params![grid.id().to_string(), grid.name()],
        )?;
        write_cells(&tx, grid)?;
        tx.commit()?;
        Ok(grid.id())
    }

    fn load_grid(&self, grid_id: GoalGridId) -> GridRepoResult<Option<GoalGrid>> {
        let name: Option<String> = self
            .conn
            .query_row(
                "SELECT display_name FROM goal_grids WHERE grid_uuid = ?1;",
                [grid_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(name) = name else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT cell_index, content, is_completed, is_highlighted, color
             FROM goal_grid_cells
             WHERE grid_uuid = ?1
             ORDER BY cell_index ASC;",
        )?;
        let mut rows = stmt.query([grid_id.to_string()])?;
        let mut cells = Vec::new();
        while let Some(row) = rows.next()? {
            cells.push(parse_cell_row(row)?);
        }

        Ok(Some(GoalGrid::from_stored(grid_id, name, cells)))
    }

    fn list_grids(&self) -> GridRepoResult<Vec<GridSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                g.grid_uuid,
                g.display_name,
                (SELECT COUNT(*) FROM goal_grid_cells c
                 WHERE c.grid_uuid = g.grid_uuid AND c.is_completed = 1) AS completed_count
             FROM goal_grids g
             ORDER BY g.created_at ASC, g.grid_uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            let completed: i64 = row.get(2)?;
            result.push(GridSummary {
                grid_id: parse_uuid(&uuid_text)?,
                display_name: row.get(1)?,
                completed_count: usize::try_from(completed).map_err(|_| {
                    GridRepoError::InvalidData(format!("negative completed count {completed}"))
                })?,
            });
        }
        Ok(result)
    }

    fn save_grid(&self, grid: &GoalGrid) -> GridRepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE goal_grids
             SET
                display_name = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE grid_uuid = ?2;",
            params![grid.name(), grid.id().to_string()],
        )?;
        if changed == 0 {
            return Err(GridRepoError::NotFound(grid.id()));
        }
        tx.execute(
            "DELETE FROM goal_grid_cells WHERE grid_uuid = ?1;",
            [grid.id().to_string()],
        )?;
        write_cells(&tx, grid)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_grid(&self, grid_id: GoalGridId) -> GridRepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM goal_grids WHERE grid_uuid = ?1;",
            [grid_id.to_string()],
        )?;
        Ok(changed > 0)
    }
}

fn grid_exists(conn: &Connection, grid_id: GoalGridId) -> GridRepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM goal_grids WHERE grid_uuid = ?1);",
        [grid_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn write_cells(conn: &Connection, grid: &GoalGrid) -> GridRepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO goal_grid_cells (
            grid_uuid,
            cell_index,
            content,
            is_completed,
            is_highlighted,
            color
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
    )?;
    for cell in grid.cells().iter().filter(|cell| !is_blank(cell)) {
        stmt.execute(params![
            grid.id().to_string(),
            i64::try_from(cell.index)
                .map_err(|_| GridRepoError::InvalidData(format!("cell index {}", cell.index)))?,
            cell.content.as_str(),
            bool_to_int(cell.is_completed),
            bool_to_int(cell.is_highlighted),
            cell.color.as_deref(),
        ])?;
    }
    Ok(())
}

fn is_blank(cell: &GridCell) -> bool {
    cell.content.is_empty() && !cell.is_completed && !cell.is_highlighted && cell.color.is_none()
}

fn parse_cell_row(row: &Row<'_>) -> GridRepoResult<GridCell> {
    let raw_index: i64 = row.get("cell_index")?;
    let index = usize::try_from(raw_index).map_err(|_| {
        GridRepoError::InvalidData(format!(
            "invalid cell index `{raw_index}` in goal_grid_cells.cell_index"
        ))
    })?;

    Ok(GridCell {
        index,
        content: row.get("content")?,
        is_completed: parse_flag(row.get("is_completed")?, "is_completed")?,
        is_highlighted: parse_flag(row.get("is_highlighted")?, "is_highlighted")?,
        color: row.get("color")?,
    })
}

fn parse_flag(value: i64, column: &'static str) -> GridRepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(GridRepoError::InvalidData(format!(
            "invalid {column} value `{other}` in goal_grid_cells.{column}"
        ))),
    }
}

fn parse_uuid(value: &str) -> GridRepoResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| {
        GridRepoError::InvalidData(format!("invalid uuid `{value}` in goal_grids.grid_uuid"))
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
