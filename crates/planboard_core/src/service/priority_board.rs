//! Priority board use-case service (Eisenhower matrix).
//!
//! # Responsibility
//! - Derive quadrant membership from the canonical task sequence.
//! - Translate drag gestures into `update_priority` / `reorder_items` calls.
//!
//! # Invariants
//! - Quadrant membership is exactly `{t : t.priority == q.priority()}`.
//! - Writes go through the `TaskStore` only; the board keeps no copy.
//! - Every command computes its final sequence before the first write.
//! - Unknown item ids and unmapped quadrant ids are silent no-ops.
//! - An in-quadrant reorder moves all quadrant members to the tail of the
//!   global sequence.

use crate::model::palette::PaletteColor;
use crate::model::quadrant::Quadrant;
use crate::model::task_item::{Priority, TaskItem, TaskItemId};
use crate::repo::task_store::{StoreResult, TaskStore};
use crate::service::drag::{place_at, DragSession};
use log::{debug, info};
use std::collections::HashSet;

/// Result type for board commands; only the store can fail.
pub type BoardResult<T> = StoreResult<T>;

/// What a board command changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardChange {
    pub priority_changed: bool,
    pub reordered: bool,
}

impl BoardChange {
    /// Nothing changed.
    pub const NONE: BoardChange = BoardChange {
        priority_changed: false,
        reordered: false,
    };

    pub fn is_noop(&self) -> bool {
        !self.priority_changed && !self.reordered
    }
}

/// Render model for one quadrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadrantView {
    pub quadrant: Quadrant,
    pub priority: Priority,
    pub items: Vec<TaskItem>,
}

/// Render model for the whole board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Quadrants in layout order.
    pub quadrants: Vec<QuadrantView>,
    pub color_palette: Vec<PaletteColor>,
}

/// Returns the members of `quadrant` in global sequence order.
pub fn quadrant_members(items: &[TaskItem], quadrant: Quadrant) -> Vec<TaskItem> {
    let priority = quadrant.priority();
    items
        .iter()
        .filter(|item| item.priority == priority)
        .cloned()
        .collect()
}

/// Builds the global id order after reordering one quadrant.
///
/// Non-members keep their relative order and come first; members follow in
/// `new_local_order`. Ids that are not current members are ignored, and
/// members missing from `new_local_order` follow the listed ones in their
/// prior order.
pub fn compose_quadrant_reorder(
    items: &[TaskItem],
    quadrant: Quadrant,
    new_local_order: &[TaskItemId],
) -> Vec<TaskItemId> {
    let priority = quadrant.priority();
    let members: Vec<TaskItemId> = items
        .iter()
        .filter(|item| item.priority == priority)
        .map(|item| item.id)
        .collect();

    let mut order: Vec<TaskItemId> = items
        .iter()
        .filter(|item| item.priority != priority)
        .map(|item| item.id)
        .collect();

    let mut placed = HashSet::with_capacity(members.len());
    for id in new_local_order {
        if members.contains(id) && placed.insert(*id) {
            order.push(*id);
        }
    }
    order.extend(members.into_iter().filter(|id| !placed.contains(id)));
    order
}

fn ids_of(items: &[TaskItem]) -> Vec<TaskItemId> {
    items.iter().map(|item| item.id).collect()
}

/// Board context bound to one mounted view.
pub struct PriorityBoard<S: TaskStore> {
    store: S,
    visible: bool,
}

impl<S: TaskStore> PriorityBoard<S> {
    /// Mounts a visible board over `store`.
    pub fn init(store: S) -> Self {
        info!("event=board_init module=board status=ok");
        Self {
            store,
            visible: true,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tears the board down and hands the store back.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Builds the current board render model.
    pub fn render(&self) -> BoardResult<BoardView> {
        let state = self.store.get_state()?;
        let quadrants = Quadrant::ALL
            .iter()
            .map(|quadrant| QuadrantView {
                quadrant: *quadrant,
                priority: quadrant.priority(),
                items: quadrant_members(&state.task_items, *quadrant),
            })
            .collect();
        Ok(BoardView {
            quadrants,
            color_palette: state.color_palette,
        })
    }

    /// Re-render hook for store changes from any source.
    ///
    /// Returns `None` without touching the store while the board is hidden.
    pub fn on_external_data_changed(&self) -> BoardResult<Option<BoardView>> {
        if !self.visible {
            return Ok(None);
        }
        self.render().map(Some)
    }

    /// Members of one quadrant in global order.
    pub fn members(&self, quadrant: Quadrant) -> BoardResult<Vec<TaskItem>> {
        let state = self.store.get_state()?;
        Ok(quadrant_members(&state.task_items, quadrant))
    }

    /// Moves an item into the quadrant with UI id `quadrant_id`.
    ///
    /// Only the priority changes; the item's global position is kept.
    pub fn move_to_quadrant(
        &mut self,
        item_id: TaskItemId,
        quadrant_id: u8,
    ) -> BoardResult<BoardChange> {
        let Some(quadrant) = Quadrant::from_id(quadrant_id) else {
            debug!(
                "event=board_move module=board status=noop reason=unmapped_quadrant quadrant_id={quadrant_id}"
            );
            return Ok(BoardChange::NONE);
        };

        let priority_changed = self.store.update_priority(item_id, quadrant.priority())?;
        debug!(
            "event=board_move module=board status=ok quadrant_id={} priority_changed={}",
            quadrant_id, priority_changed
        );
        Ok(BoardChange {
            priority_changed,
            reordered: false,
        })
    }

    /// Applies a new visual order to one quadrant.
    pub fn reorder_within_quadrant(
        &mut self,
        quadrant_id: u8,
        new_local_order: &[TaskItemId],
    ) -> BoardResult<BoardChange> {
        let Some(quadrant) = Quadrant::from_id(quadrant_id) else {
            debug!(
                "event=board_reorder module=board status=noop reason=unmapped_quadrant quadrant_id={quadrant_id}"
            );
            return Ok(BoardChange::NONE);
        };

        let state = self.store.get_state()?;
        let order = compose_quadrant_reorder(&state.task_items, quadrant, new_local_order);
        if order == ids_of(&state.task_items) {
            return Ok(BoardChange::NONE);
        }

        self.store.reorder_items(&order)?;
        debug!(
            "event=board_reorder module=board status=ok quadrant_id={} item_count={}",
            quadrant_id,
            order.len()
        );
        Ok(BoardChange {
            priority_changed: false,
            reordered: true,
        })
    }

    /// Handles `dragstart`. Returns `None` for unknown items.
    pub fn begin_drag(&self, item_id: TaskItemId) -> BoardResult<Option<DragSession>> {
        let state = self.store.get_state()?;
        let session = state
            .task_items
            .iter()
            .find(|item| item.id == item_id)
            .map(|item| DragSession::start(item_id, Quadrant::for_priority(item.priority)));
        if session.is_none() {
            debug!("event=drag_start module=board status=noop reason=unknown_item");
        }
        Ok(session)
    }

    /// Handles `drop` onto the quadrant with UI id `quadrant_id`.
    ///
    /// Changes the priority when the quadrant differs from the item's, and
    /// reorders the target quadrant when the session's marker sits in it and
    /// yields a different local order. Dropping in place changes nothing.
    pub fn drop_drag(
        &mut self,
        session: DragSession,
        quadrant_id: u8,
    ) -> BoardResult<BoardChange> {
        let Some(target) = Quadrant::from_id(quadrant_id) else {
            debug!(
                "event=drag_drop module=board status=noop reason=unmapped_quadrant quadrant_id={quadrant_id}"
            );
            return Ok(BoardChange::NONE);
        };

        let dragged = session.dragged();
        let mut items = self.store.get_state()?.task_items;
        let Some(item) = items.iter_mut().find(|item| item.id == dragged) else {
            debug!("event=drag_drop module=board status=noop reason=unknown_item");
            return Ok(BoardChange::NONE);
        };

        let new_priority = target.priority();
        let priority_changed = item.priority != new_priority;
        item.priority = new_priority;

        let current_local = ids_of(&quadrant_members(&items, target));
        let new_order = session
            .marker_in(target)
            .map(|point| place_at(&current_local, dragged, point))
            .filter(|new_local| *new_local != current_local)
            .map(|new_local| compose_quadrant_reorder(&items, target, &new_local));

        if priority_changed {
            self.store.update_priority(dragged, new_priority)?;
        }
        let reordered = match new_order {
            Some(order) => {
                self.store.reorder_items(&order)?;
                true
            }
            None => false,
        };

        debug!(
            "event=drag_drop module=board status=ok origin_quadrant={} target_quadrant={} priority_changed={} reordered={}",
            session.origin().id(),
            quadrant_id,
            priority_changed,
            reordered
        );
        Ok(BoardChange {
            priority_changed,
            reordered,
        })
    }
}
