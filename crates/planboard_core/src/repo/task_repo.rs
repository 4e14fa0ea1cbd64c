//! SQLite-backed task store.
//!
//! # Responsibility
//! - Persist the global task sequence and expose the color palette.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Sequence order is `sort_order ASC, item_uuid ASC`.
//! - Reorders rewrite `sort_order` for every row in one immediate
//!   transaction, so a reader never sees a half-applied order.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::ensure_schema_ready;
use crate::model::palette::PaletteColor;
use crate::model::task_item::{Priority, TaskItem, TaskItemId};
use crate::repo::task_store::{
    arrange_by_ids, BoardState, StoreError, StoreResult, TaskStore,
};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT item_uuid, text, priority
FROM task_items
ORDER BY sort_order ASC, item_uuid ASC";

/// Task store persisting into `task_items` / `palette_colors`.
pub struct SqliteTaskStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskStore<'conn> {
    /// Creates store from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_schema_ready(
            conn,
            &[
                (
                    "task_items",
                    &["item_uuid", "text", "priority", "sort_order", "updated_at"],
                ),
                ("palette_colors", &["name", "color_value", "sort_order"]),
            ],
        )?;
        Ok(Self { conn })
    }

    /// Loads one item by id.
    pub fn get_item(&self, id: TaskItemId) -> StoreResult<Option<TaskItem>> {
        self.conn
            .query_row(
                "SELECT item_uuid, text, priority FROM task_items WHERE item_uuid = ?1;",
                [id.to_string()],
                |row| Ok(parse_task_row(row)),
            )
            .optional()?
            .transpose()
    }
}

impl TaskStore for SqliteTaskStore<'_> {
    fn get_state(&self) -> StoreResult<BoardState> {
        Ok(BoardState {
            task_items: load_items(self.conn)?,
            color_palette: load_palette(self.conn)?,
        })
    }

    fn add_item(&mut self, item: TaskItem) -> StoreResult<TaskItemId> {
        if self.get_item(item.id)?.is_some() {
            return Err(StoreError::DuplicateId(item.id));
        }

        let sort_order: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM task_items;",
            [],
            |row| row.get(0),
        )?;
        self.conn.execute(
            "INSERT INTO task_items (item_uuid, text, priority, sort_order)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                item.id.to_string(),
                item.text.as_str(),
                i64::from(item.priority.value()),
                sort_order,
            ],
        )?;
        Ok(item.id)
    }

    fn remove_item(&mut self, id: TaskItemId) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM task_items WHERE item_uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn update_priority(&mut self, id: TaskItemId, priority: Priority) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE task_items
             SET
                priority = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE item_uuid = ?2
               AND priority <> ?1;",
            params![i64::from(priority.value()), id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn reorder_items(&mut self, ids_in_order: &[TaskItemId]) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = load_items(&tx)?;
        let arranged = arrange_by_ids(&current, ids_in_order);
        {
            let mut stmt =
                tx.prepare("UPDATE task_items SET sort_order = ?1 WHERE item_uuid = ?2;")?;
            for (position, item) in arranged.iter().enumerate() {
                let sort_order = i64::try_from(position).map_err(|_| {
                    StoreError::InvalidData(format!("sort order overflow at {position}"))
                })?;
                stmt.execute(params![sort_order, item.id.to_string()])?;
            }
        }
        tx.commit()?;
        debug!(
            "event=task_reorder module=store status=ok item_count={}",
            arranged.len()
        );
        Ok(())
    }
}

fn load_items(conn: &Connection) -> StoreResult<Vec<TaskItem>> {
    let mut stmt = conn.prepare(TASK_SELECT_SQL)?;
    let mut rows = stmt.query([])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_task_row(row)?);
    }
    Ok(items)
}

fn load_palette(conn: &Connection) -> StoreResult<Vec<PaletteColor>> {
    let mut stmt = conn.prepare(
        "SELECT name, color_value FROM palette_colors ORDER BY sort_order ASC, name ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut palette = Vec::new();
    while let Some(row) = rows.next()? {
        palette.push(PaletteColor::new(
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
        ));
    }
    Ok(palette)
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<TaskItem> {
    let uuid_text: String = row.get("item_uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid uuid value `{uuid_text}` in task_items.item_uuid"
        ))
    })?;

    let raw_priority: i64 = row.get("priority")?;
    let priority = u8::try_from(raw_priority)
        .ok()
        .and_then(Priority::from_value)
        .ok_or_else(|| {
            StoreError::InvalidData(format!(
                "invalid priority `{raw_priority}` in task_items.priority"
            ))
        })?;

    Ok(TaskItem::with_id(id, row.get::<_, String>("text")?, priority))
}
