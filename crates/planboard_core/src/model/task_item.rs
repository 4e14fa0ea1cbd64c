//! Task item domain model for the priority board.
//!
//! # Responsibility
//! - Define the canonical task record owned by the external state container.
//! - Keep priority values closed over `1..=4` at the type level.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - Every item carries exactly one `Priority`.
//! - One ordered sequence never contains the same `id` twice.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task item.
pub type TaskItemId = Uuid;

/// Importance/urgency rank of a task item. `Urgent` (1) ranks highest.
///
/// Serialized as its numeric value to match the external store shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    /// Urgent and important.
    Urgent = 1,
    /// Important but not urgent.
    Important = 2,
    /// Urgent but not important.
    Delegate = 3,
    /// Neither urgent nor important.
    Drop = 4,
}

impl Priority {
    /// All priorities in rank order.
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::Important,
        Priority::Delegate,
        Priority::Drop,
    ];

    /// Returns the numeric rank in `1..=4`.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Resolves a numeric rank, returning `None` outside `1..=4`.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Urgent),
            2 => Some(Self::Important),
            3 => Some(Self::Delegate),
            4 => Some(Self::Drop),
            _ => None,
        }
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.value()
    }
}

impl TryFrom<u8> for Priority {
    type Error = PriorityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(PriorityError(i64::from(value)))
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Raised when a raw value cannot be mapped to a `Priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityError(pub i64);

impl Display for PriorityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "priority must be in 1..=4, got {}", self.0)
    }
}

impl Error for PriorityError {}

/// Canonical task record shown on the priority board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: TaskItemId,
    /// Display label.
    pub text: String,
    pub priority: Priority,
}

impl TaskItem {
    /// Creates a task item with a generated stable ID.
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        Self::with_id(Uuid::new_v4(), text, priority)
    }

    /// Creates a task item with a caller-provided stable ID.
    ///
    /// Used by load paths where identity already exists in storage.
    pub fn with_id(id: TaskItemId, text: impl Into<String>, priority: Priority) -> Self {
        Self {
            id,
            text: text.into(),
            priority,
        }
    }
}

/// Returns the first id that appears more than once, if any.
pub fn find_duplicate_id(items: &[TaskItem]) -> Option<TaskItemId> {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().map(|item| item.id).find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::{find_duplicate_id, Priority, TaskItem};

    #[test]
    fn priority_value_roundtrip_covers_all_ranks() {
        for priority in Priority::ALL {
            assert_eq!(Priority::from_value(priority.value()), Some(priority));
        }
        assert_eq!(Priority::from_value(0), None);
        assert_eq!(Priority::from_value(5), None);
    }

    #[test]
    fn priority_try_from_rejects_out_of_range() {
        let err = Priority::try_from(9).unwrap_err();
        assert!(err.to_string().contains("1..=4"));
    }

    #[test]
    fn find_duplicate_id_detects_repeated_items() {
        let item = TaskItem::new("write report", Priority::Urgent);
        let other = TaskItem::new("call bank", Priority::Drop);
        assert_eq!(find_duplicate_id(&[item.clone(), other.clone()]), None);
        assert_eq!(find_duplicate_id(&[item.clone(), other, item.clone()]), Some(item.id));
    }
}
