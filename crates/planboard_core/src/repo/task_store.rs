//! External state container contract for the priority board.
//!
//! # Responsibility
//! - Define the only read (`get_state`) and write (`update_priority`,
//!   `reorder_items`) entry points into the canonical task sequence.
//! - Provide an in-memory implementation for mounted views and tests.
//!
//! # Invariants
//! - The sequence never contains duplicate ids.
//! - Unknown ids are ignored by writes; they are not errors.
//! - `reorder_items` only permutes: it never adds or drops items.

use crate::db::DbError;
use crate::model::palette::PaletteColor;
use crate::model::task_item::{find_duplicate_id, Priority, TaskItem, TaskItemId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by task store implementations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// An item with this id already lives in the sequence.
    DuplicateId(TaskItemId),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "task item already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid task data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateId(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Snapshot of the canonical board state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    /// Global ordered task sequence.
    pub task_items: Vec<TaskItem>,
    pub color_palette: Vec<PaletteColor>,
}

/// Canonical store owning the task sequence and color palette.
pub trait TaskStore {
    /// Returns a snapshot of items (in global order) and palette.
    fn get_state(&self) -> StoreResult<BoardState>;
    /// Appends one item to the end of the sequence.
    fn add_item(&mut self, item: TaskItem) -> StoreResult<TaskItemId>;
    /// Removes one item. Returns `false` when the id is unknown.
    fn remove_item(&mut self, id: TaskItemId) -> StoreResult<bool>;
    /// Sets one item's priority. Returns `false` when the id is unknown or
    /// the priority is already set.
    fn update_priority(&mut self, id: TaskItemId, priority: Priority) -> StoreResult<bool>;
    /// Rearranges the sequence to follow `ids_in_order`.
    ///
    /// See `arrange_by_ids` for handling of unknown and unlisted ids.
    fn reorder_items(&mut self, ids_in_order: &[TaskItemId]) -> StoreResult<()>;
}

/// Orders `items` by `ids_in_order`.
///
/// Listed ids come first in the given order; unknown and repeated ids are
/// skipped; unlisted items follow in their prior relative order.
pub fn arrange_by_ids(items: &[TaskItem], ids_in_order: &[TaskItemId]) -> Vec<TaskItem> {
    let mut placed = HashSet::with_capacity(items.len());
    let mut arranged = Vec::with_capacity(items.len());
    for id in ids_in_order {
        if placed.contains(id) {
            continue;
        }
        if let Some(item) = items.iter().find(|item| item.id == *id) {
            placed.insert(*id);
            arranged.push(item.clone());
        }
    }
    arranged.extend(
        items
            .iter()
            .filter(|item| !placed.contains(&item.id))
            .cloned(),
    );
    arranged
}

/// In-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    items: Vec<TaskItem>,
    palette: Vec<PaletteColor>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from an existing sequence.
    ///
    /// # Errors
    /// - Returns `StoreError::DuplicateId` when `items` repeats an id.
    pub fn with_items(
        items: Vec<TaskItem>,
        palette: Vec<PaletteColor>,
    ) -> StoreResult<Self> {
        if let Some(id) = find_duplicate_id(&items) {
            return Err(StoreError::DuplicateId(id));
        }
        Ok(Self { items, palette })
    }

    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }
}

impl TaskStore for InMemoryTaskStore {
    fn get_state(&self) -> StoreResult<BoardState> {
        Ok(BoardState {
            task_items: self.items.clone(),
            color_palette: self.palette.clone(),
        })
    }

    fn add_item(&mut self, item: TaskItem) -> StoreResult<TaskItemId> {
        if self.items.iter().any(|existing| existing.id == item.id) {
            return Err(StoreError::DuplicateId(item.id));
        }
        let id = item.id;
        self.items.push(item);
        Ok(id)
    }

    fn remove_item(&mut self, id: TaskItemId) -> StoreResult<bool> {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        Ok(self.items.len() != before)
    }

    fn update_priority(&mut self, id: TaskItemId, priority: Priority) -> StoreResult<bool> {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) if item.priority != priority => {
                item.priority = priority;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn reorder_items(&mut self, ids_in_order: &[TaskItemId]) -> StoreResult<()> {
        self.items = arrange_by_ids(&self.items, ids_in_order);
        Ok(())
    }
}
