//! Drag gesture state for the priority board.
//!
//! # Responsibility
//! - Hold the transient insertion marker between `dragstart` and `drop`.
//! - Compute the visual insertion point from sibling geometry.
//!
//! # Invariants
//! - A `DragSession` has no access to the task store; `drag_over` can only
//!   move the marker, never canonical data.
//! - Only `PriorityBoard::drop_drag` turns a session into a mutation.

use crate::model::quadrant::Quadrant;
use crate::model::task_item::TaskItemId;
use log::debug;

/// Vertical geometry of one rendered sibling item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiblingRect {
    pub id: TaskItemId,
    pub top: f64,
    pub height: f64,
}

impl SiblingRect {
    fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Where a dropped item lands inside a quadrant container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// Directly before the given sibling.
    Before(TaskItemId),
    /// After the last sibling.
    End,
}

/// Picks the insertion point for a pointer at `pointer_y`.
///
/// Chooses the sibling (other than `dragged`) whose vertical center lies
/// below the pointer with the offset closest to zero. Falls back to `End`.
pub fn insertion_point(
    siblings: &[SiblingRect],
    dragged: TaskItemId,
    pointer_y: f64,
) -> InsertionPoint {
    let mut closest: Option<(f64, TaskItemId)> = None;
    for sibling in siblings.iter().filter(|sibling| sibling.id != dragged) {
        let offset = pointer_y - sibling.center();
        if offset < 0.0 && closest.map_or(true, |(best, _)| offset > best) {
            closest = Some((offset, sibling.id));
        }
    }
    closest.map_or(InsertionPoint::End, |(_, id)| InsertionPoint::Before(id))
}

/// Returns `members` with `dragged` moved to `point`.
///
/// `dragged` is inserted even if it was not a member. A `Before` target
/// that is not a member places the item at the end.
pub fn place_at(
    members: &[TaskItemId],
    dragged: TaskItemId,
    point: InsertionPoint,
) -> Vec<TaskItemId> {
    let mut placed: Vec<TaskItemId> = members
        .iter()
        .copied()
        .filter(|id| *id != dragged)
        .collect();
    let position = match point {
        InsertionPoint::Before(anchor) => placed.iter().position(|id| *id == anchor),
        InsertionPoint::End => None,
    };
    match position {
        Some(index) => placed.insert(index, dragged),
        None => placed.push(dragged),
    }
    placed
}

/// One in-flight drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    dragged: TaskItemId,
    origin: Quadrant,
    marker: Option<(Quadrant, InsertionPoint)>,
}

impl DragSession {
    pub(crate) fn start(dragged: TaskItemId, origin: Quadrant) -> Self {
        Self {
            dragged,
            origin,
            marker: None,
        }
    }

    pub fn dragged(&self) -> TaskItemId {
        self.dragged
    }

    /// Quadrant the item was picked up from.
    pub fn origin(&self) -> Quadrant {
        self.origin
    }

    /// Current insertion marker, if the pointer is over a quadrant.
    pub fn marker(&self) -> Option<(Quadrant, InsertionPoint)> {
        self.marker
    }

    /// Marker position inside `quadrant`, if the marker is there.
    pub fn marker_in(&self, quadrant: Quadrant) -> Option<InsertionPoint> {
        self.marker
            .filter(|(marked, _)| *marked == quadrant)
            .map(|(_, point)| point)
    }

    /// Handles `dragover` above a quadrant container.
    ///
    /// Unmapped quadrant ids clear the marker.
    pub fn drag_over(
        &mut self,
        quadrant_id: u8,
        siblings: &[SiblingRect],
        pointer_y: f64,
    ) -> Option<InsertionPoint> {
        let Some(quadrant) = Quadrant::from_id(quadrant_id) else {
            self.marker = None;
            return None;
        };
        let point = insertion_point(siblings, self.dragged, pointer_y);
        self.marker = Some((quadrant, point));
        Some(point)
    }

    /// Handles `dragend` without a drop: the gesture is discarded.
    pub fn end(self) {
        debug!(
            "event=drag_end module=board status=noop origin_quadrant={}",
            self.origin.id()
        );
    }
}
