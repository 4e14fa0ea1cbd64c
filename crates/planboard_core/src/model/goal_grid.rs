//! Goal grid (mandal-art) domain model.
//!
//! # Responsibility
//! - Define the fixed 9x9 cell matrix and its 3x3 block geometry.
//! - Own the static layout tables: topic-to-mirror sync map and cell palette.
//!
//! # Invariants
//! - A grid always holds exactly `CELL_COUNT` cells, indexed row-major.
//! - Sync sources live in the center block and never include the title cell.
//! - Sync targets live outside the center block and are unique.
//! - Layout tables are validated once at construction; a bad table is a
//!   programmer error and never reaches runtime edits.

use crate::model::palette::{is_color_literal, CellPalette};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Cells per grid side.
pub const GRID_SIDE: usize = 9;
/// Total cells in one grid.
pub const CELL_COUNT: usize = GRID_SIDE * GRID_SIDE;
/// Cells per block side.
pub const BLOCK_SIDE: usize = 3;
/// Row/column where the center block starts.
pub const CENTER_BLOCK_ORIGIN: usize = 3;
/// Center cell of the whole grid; its content is the grid display name.
pub const TITLE_CELL_INDEX: usize = 40;

/// Topic cell -> mirror cell (center of the matching outer block).
pub const STANDARD_SYNC_MAP: [(usize, usize); 8] = [
    (30, 10),
    (31, 13),
    (32, 16),
    (39, 37),
    (41, 43),
    (48, 64),
    (49, 67),
    (50, 70),
];

/// Palette for the title and topic cells.
pub const STANDARD_CELL_PALETTE: [(usize, CellPalette); 9] = [
    (30, CellPalette::new("#ffadad", "#333333")),
    (31, CellPalette::new("#ffd6a5", "#333333")),
    (32, CellPalette::new("#fdffb6", "#333333")),
    (39, CellPalette::new("#caffbf", "#333333")),
    (40, CellPalette::new("#4a4e69", "#ffffff")),
    (41, CellPalette::new("#9bf6ff", "#333333")),
    (48, CellPalette::new("#a0c4ff", "#333333")),
    (49, CellPalette::new("#bdb2ff", "#333333")),
    (50, CellPalette::new("#ffc6ff", "#333333")),
];

static STANDARD_LAYOUT: Lazy<GridLayout> = Lazy::new(|| {
    GridLayout::try_new(&STANDARD_SYNC_MAP, &STANDARD_CELL_PALETTE)
        .expect("standard goal grid layout must be valid")
});

/// Stable identifier for a goal grid.
pub type GoalGridId = Uuid;

/// Returns `(row, col)` of a row-major cell index.
pub fn cell_position(index: usize) -> (usize, usize) {
    (index / GRID_SIDE, index % GRID_SIDE)
}

/// Returns `(block_row, block_col)` of the 3x3 block containing `index`.
pub fn block_of(index: usize) -> (usize, usize) {
    let (row, col) = cell_position(index);
    (row / BLOCK_SIDE, col / BLOCK_SIDE)
}

/// Returns whether `index` lies inside the center block.
pub fn is_center_block(index: usize) -> bool {
    index < CELL_COUNT && block_of(index) == (1, 1)
}

/// Returns the center-block cell that governs the block containing `index`.
///
/// Block `(r, c)` maps to center-block cell `(r + 3, c + 3)`; the center
/// block itself maps to the title cell.
pub fn governing_topic_index(index: usize) -> usize {
    let (block_row, block_col) = block_of(index);
    (block_row + CENTER_BLOCK_ORIGIN) * GRID_SIDE + (block_col + CENTER_BLOCK_ORIGIN)
}

/// Layout table configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridConfigError {
    /// Sync source index is outside the grid.
    SyncSourceOutOfRange(usize),
    /// Sync target index is outside the grid.
    SyncTargetOutOfRange { source: usize, target: usize },
    /// Sync source is not a topic cell of the center block.
    SyncSourceNotTopic(usize),
    /// Sync target sits inside the center block.
    SyncTargetInCenterBlock { source: usize, target: usize },
    /// Same source listed twice.
    DuplicateSyncSource(usize),
    /// Two sources mirror into one target.
    DuplicateSyncTarget(usize),
    /// Palette entry index is outside the grid.
    PaletteIndexOutOfRange(usize),
    /// Palette entry color is not a hex literal.
    InvalidPaletteColor(usize),
}

impl Display for GridConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SyncSourceOutOfRange(index) => {
                write!(f, "sync source {index} is outside the {CELL_COUNT}-cell grid")
            }
            Self::SyncTargetOutOfRange { source, target } => write!(
                f,
                "sync target {target} for source {source} is outside the {CELL_COUNT}-cell grid"
            ),
            Self::SyncSourceNotTopic(index) => {
                write!(f, "sync source {index} is not a topic cell")
            }
            Self::SyncTargetInCenterBlock { source, target } => write!(
                f,
                "sync target {target} for source {source} must be outside the center block"
            ),
            Self::DuplicateSyncSource(index) => write!(f, "sync source {index} listed twice"),
            Self::DuplicateSyncTarget(index) => {
                write!(f, "sync target {index} mirrors more than one source")
            }
            Self::PaletteIndexOutOfRange(index) => {
                write!(f, "palette index {index} is outside the {CELL_COUNT}-cell grid")
            }
            Self::InvalidPaletteColor(index) => {
                write!(f, "palette entry {index} is not a hex color")
            }
        }
    }
}

impl Error for GridConfigError {}

/// Validated static tables driving grid sync and coloring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    sync_targets: BTreeMap<usize, usize>,
    sync_sources: BTreeMap<usize, usize>,
    palette: BTreeMap<usize, CellPalette>,
}

impl GridLayout {
    /// Builds a layout from sync pairs and palette entries.
    ///
    /// # Errors
    /// - Returns `GridConfigError` for any out-of-range, misplaced or
    ///   duplicated index, and for non-hex palette colors.
    pub fn try_new(
        sync_pairs: &[(usize, usize)],
        palette: &[(usize, CellPalette)],
    ) -> Result<Self, GridConfigError> {
        let mut sync_targets = BTreeMap::new();
        let mut sync_sources = BTreeMap::new();
        for &(source, target) in sync_pairs {
            if source >= CELL_COUNT {
                return Err(GridConfigError::SyncSourceOutOfRange(source));
            }
            if target >= CELL_COUNT {
                return Err(GridConfigError::SyncTargetOutOfRange { source, target });
            }
            if !is_center_block(source) || source == TITLE_CELL_INDEX {
                return Err(GridConfigError::SyncSourceNotTopic(source));
            }
            if is_center_block(target) {
                return Err(GridConfigError::SyncTargetInCenterBlock { source, target });
            }
            if sync_targets.insert(source, target).is_some() {
                return Err(GridConfigError::DuplicateSyncSource(source));
            }
            if sync_sources.insert(target, source).is_some() {
                return Err(GridConfigError::DuplicateSyncTarget(target));
            }
        }

        let mut palette_map = BTreeMap::new();
        for &(index, entry) in palette {
            if index >= CELL_COUNT {
                return Err(GridConfigError::PaletteIndexOutOfRange(index));
            }
            if !is_color_literal(entry.background) || !is_color_literal(entry.text_color) {
                return Err(GridConfigError::InvalidPaletteColor(index));
            }
            palette_map.insert(index, entry);
        }

        Ok(Self {
            sync_targets,
            sync_sources,
            palette: palette_map,
        })
    }

    /// Returns the process-wide standard mandal-art layout.
    ///
    /// # Panics
    /// - Panics on first use if the built-in tables are invalid.
    pub fn standard() -> &'static GridLayout {
        &STANDARD_LAYOUT
    }

    /// Mirror target of a topic cell.
    pub fn sync_target(&self, source: usize) -> Option<usize> {
        self.sync_targets.get(&source).copied()
    }

    /// Topic cell feeding a mirror cell.
    pub fn sync_source(&self, target: usize) -> Option<usize> {
        self.sync_sources.get(&target).copied()
    }

    /// All `(source, target)` pairs in ascending source order.
    pub fn sync_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sync_targets
            .iter()
            .map(|(source, target)| (*source, *target))
    }

    /// Mirror cells accept no direct edits.
    pub fn is_read_only(&self, index: usize) -> bool {
        self.sync_sources.contains_key(&index)
    }

    pub fn palette_entry(&self, index: usize) -> Option<CellPalette> {
        self.palette.get(&index).copied()
    }
}

/// One cell of a goal grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    /// Row-major position; doubles as the stable cell identifier.
    pub index: usize,
    pub content: String,
    pub is_completed: bool,
    pub is_highlighted: bool,
    /// Explicit color override.
    pub color: Option<String>,
}

impl GridCell {
    /// Creates an empty cell at `index`.
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            content: String::new(),
            is_completed: false,
            is_highlighted: false,
            color: None,
        }
    }

    /// Stable element identifier used by UI shells.
    pub fn element_id(&self) -> String {
        format!("cell-{}", self.index)
    }
}

/// A 9x9 goal grid with a display name bound to the title cell.
///
/// Cells are private: mutations go through `GoalGridView` so the mirror and
/// title invariants cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalGrid {
    id: GoalGridId,
    name: String,
    cells: Vec<GridCell>,
}

impl GoalGrid {
    /// Creates an empty grid with a generated stable ID.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates an empty grid with a caller-provided stable ID.
    pub fn with_id(id: GoalGridId) -> Self {
        Self {
            id,
            name: String::new(),
            cells: (0..CELL_COUNT).map(GridCell::empty).collect(),
        }
    }

    /// Rebuilds a grid from stored cells. Missing indices become empty
    /// cells; indices outside the grid are dropped.
    pub(crate) fn from_stored(
        id: GoalGridId,
        name: String,
        stored: impl IntoIterator<Item = GridCell>,
    ) -> Self {
        let mut grid = Self::with_id(id);
        grid.name = name;
        for cell in stored {
            if cell.index < CELL_COUNT {
                let index = cell.index;
                grid.cells[index] = cell;
            }
        }
        grid
    }

    pub fn id(&self) -> GoalGridId {
        self.id
    }

    /// Display name; equal to the title cell content.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.cells.get(index)
    }

    /// Number of cells marked completed.
    pub fn completed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_completed).count()
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> Option<&mut GridCell> {
        self.cells.get_mut(index)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Default for GoalGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        block_of, governing_topic_index, is_center_block, GoalGrid, GridConfigError, GridLayout,
        CELL_COUNT, STANDARD_CELL_PALETTE, STANDARD_SYNC_MAP, TITLE_CELL_INDEX,
    };
    use crate::model::palette::CellPalette;

    #[test]
    fn standard_layout_mirrors_into_outer_block_centers() {
        let layout = GridLayout::standard();
        for (source, target) in STANDARD_SYNC_MAP {
            assert_eq!(layout.sync_target(source), Some(target));
            assert_eq!(layout.sync_source(target), Some(source));
            assert!(layout.is_read_only(target));
            assert!(!layout.is_read_only(source));
            // Mirror sits at the middle of its block.
            let (row, col) = (target / 9, target % 9);
            assert_eq!((row % 3, col % 3), (1, 1));
            assert_eq!(governing_topic_index(target), source);
        }
    }

    #[test]
    fn block_geometry_uses_integer_division() {
        assert_eq!(block_of(0), (0, 0));
        assert_eq!(block_of(TITLE_CELL_INDEX), (1, 1));
        assert_eq!(block_of(80), (2, 2));
        assert!(is_center_block(30));
        assert!(!is_center_block(10));
        assert!(!is_center_block(CELL_COUNT));
        assert_eq!(governing_topic_index(TITLE_CELL_INDEX), TITLE_CELL_INDEX);
        assert_eq!(governing_topic_index(0), 30);
        assert_eq!(governing_topic_index(80), 50);
    }

    #[test]
    fn layout_rejects_out_of_range_target() {
        let err = GridLayout::try_new(&[(30, 81)], &STANDARD_CELL_PALETTE).unwrap_err();
        assert_eq!(
            err,
            GridConfigError::SyncTargetOutOfRange {
                source: 30,
                target: 81
            }
        );
    }

    #[test]
    fn layout_rejects_title_and_outer_sources() {
        assert_eq!(
            GridLayout::try_new(&[(TITLE_CELL_INDEX, 10)], &[]).unwrap_err(),
            GridConfigError::SyncSourceNotTopic(TITLE_CELL_INDEX)
        );
        assert_eq!(
            GridLayout::try_new(&[(0, 10)], &[]).unwrap_err(),
            GridConfigError::SyncSourceNotTopic(0)
        );
        assert_eq!(
            GridLayout::try_new(&[(30, 31)], &[]).unwrap_err(),
            GridConfigError::SyncTargetInCenterBlock {
                source: 30,
                target: 31
            }
        );
    }

    #[test]
    fn layout_rejects_duplicate_targets_and_bad_palette() {
        assert_eq!(
            GridLayout::try_new(&[(30, 10), (31, 10)], &[]).unwrap_err(),
            GridConfigError::DuplicateSyncTarget(10)
        );
        assert_eq!(
            GridLayout::try_new(&[], &[(99, CellPalette::new("#fff", "#000"))]).unwrap_err(),
            GridConfigError::PaletteIndexOutOfRange(99)
        );
        assert_eq!(
            GridLayout::try_new(&[], &[(30, CellPalette::new("pink", "#000"))]).unwrap_err(),
            GridConfigError::InvalidPaletteColor(30)
        );
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = GoalGrid::new();
        assert_eq!(grid.cells().len(), CELL_COUNT);
        assert!(grid.name().is_empty());
        assert!(grid.cells().iter().all(|cell| cell.content.is_empty()));
        assert_eq!(grid.completed_count(), 0);
        assert_eq!(grid.cell(12).map(|cell| cell.element_id()).as_deref(), Some("cell-12"));
    }
}
