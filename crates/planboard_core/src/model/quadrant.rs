//! Eisenhower-matrix quadrants.
//!
//! # Responsibility
//! - Map each quadrant of the 2x2 board to exactly one priority.
//!
//! # Invariants
//! - The quadrant/priority table is a bijection; quadrant ids are not
//!   priority values (quadrant 2 holds priority 3, quadrant 4 holds 2).
//! - Membership is derived from item priority and never stored.

use crate::model::task_item::Priority;
use serde::{Deserialize, Serialize};

/// One bucket of the importance/urgency matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// Top-left.
    First,
    /// Top-right.
    Second,
    /// Bottom-left.
    Third,
    /// Bottom-right.
    Fourth,
}

impl Quadrant {
    /// All quadrants in board layout order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::First,
        Quadrant::Second,
        Quadrant::Third,
        Quadrant::Fourth,
    ];

    /// Resolves a UI quadrant id. Unmapped ids return `None`.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            4 => Some(Self::Fourth),
            _ => None,
        }
    }

    /// Returns the UI quadrant id in `1..=4`.
    pub fn id(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
        }
    }

    /// Returns the priority every member of this quadrant carries.
    pub fn priority(self) -> Priority {
        match self {
            Self::First => Priority::Urgent,
            Self::Second => Priority::Delegate,
            Self::Third => Priority::Drop,
            Self::Fourth => Priority::Important,
        }
    }

    /// Returns the quadrant that displays `priority`.
    pub fn for_priority(priority: Priority) -> Self {
        match priority {
            Priority::Urgent => Self::First,
            Priority::Delegate => Self::Second,
            Priority::Drop => Self::Third,
            Priority::Important => Self::Fourth,
        }
    }
}
