//! Goal grid use-case service.
//!
//! # Responsibility
//! - Apply cell edits, toggles and color overrides to a mounted grid.
//! - Keep mirror cells and the grid name in step with their sources.
//! - Resolve render-time cell colors.
//!
//! # Invariants
//! - After any edit or render pass, every mirror cell holds its topic cell's
//!   content.
//! - Mirror cells have no text-edit entry point: `EditableCell` handles are
//!   never issued for them.
//! - Title cell content and grid name are always equal.
//! - Color precedence: completed (representative color) > override >
//!   palette (mirrors use their source's entry) > default.

use crate::model::goal_grid::{
    governing_topic_index, GoalGrid, GoalGridId, GridLayout, CELL_COUNT, TITLE_CELL_INDEX,
};
use crate::model::palette::{
    is_color_literal, CellPalette, DEFAULT_BACKGROUND, DEFAULT_TEXT_COLOR,
};
use log::{debug, info};

/// Handle to a cell that accepts text edits.
///
/// Obtained from `GoalGridView::editable`; never refers to a mirror cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditableCell(usize);

impl EditableCell {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Side effects of one text edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellEditOutcome {
    /// Mirror cell that received the same text.
    pub mirrored_to: Option<usize>,
    /// Whether the grid name changed with the title cell.
    pub renamed: bool,
}

/// Render model for one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell {
    pub index: usize,
    pub element_id: String,
    pub content: String,
    pub is_completed: bool,
    pub is_highlighted: bool,
    pub is_title: bool,
    pub is_read_only: bool,
    pub background: String,
    pub text_color: String,
}

/// Editing context for one mounted grid.
pub struct GoalGridView<'a> {
    grid: &'a mut GoalGrid,
    layout: &'a GridLayout,
}

impl<'a> GoalGridView<'a> {
    /// Mounts `grid` under `layout` and re-applies every mirror.
    pub fn mount(grid: &'a mut GoalGrid, layout: &'a GridLayout) -> Self {
        let mut view = Self { grid, layout };
        let repaired = view.sync_mirrors();
        if repaired > 0 {
            info!("event=grid_mount module=grid status=repaired mirror_count={repaired}");
        }
        view
    }

    pub fn grid(&self) -> &GoalGrid {
        self.grid
    }

    pub fn layout(&self) -> &GridLayout {
        self.layout
    }

    /// Returns an edit handle, or `None` for mirror or out-of-range cells.
    pub fn editable(&self, index: usize) -> Option<EditableCell> {
        if index >= CELL_COUNT || self.layout.is_read_only(index) {
            return None;
        }
        Some(EditableCell(index))
    }

    /// Sets cell text, propagating to the mirror and to the grid name.
    pub fn edit_cell(&mut self, cell: EditableCell, text: impl Into<String>) -> CellEditOutcome {
        let text = text.into();
        let index = cell.index();
        let mirrored_to = self.layout.sync_target(index);

        if let Some(target) = mirrored_to.and_then(|target| self.grid.cell_mut(target)) {
            target.content = text.clone();
        }
        let renamed = index == TITLE_CELL_INDEX;
        if renamed {
            self.grid.set_name(text.clone());
        }
        if let Some(cell) = self.grid.cell_mut(index) {
            cell.content = text;
        }

        debug!(
            "event=grid_edit module=grid status=ok cell_index={} mirrored={} renamed={}",
            index,
            mirrored_to.is_some(),
            renamed
        );
        CellEditOutcome {
            mirrored_to,
            renamed,
        }
    }

    /// Adapter entry point taking a raw index.
    ///
    /// Mirror and out-of-range cells are ignored and return `None`.
    pub fn edit_cell_at(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Option<CellEditOutcome> {
        match self.editable(index) {
            Some(cell) => Some(self.edit_cell(cell, text)),
            None => {
                debug!(
                    "event=grid_edit module=grid status=noop reason=read_only cell_index={index}"
                );
                None
            }
        }
    }

    /// Flips completion. Returns the new value, or `None` when out of range.
    pub fn toggle_completed(&mut self, index: usize) -> Option<bool> {
        let cell = self.grid.cell_mut(index)?;
        cell.is_completed = !cell.is_completed;
        Some(cell.is_completed)
    }

    /// Flips highlight. Returns the new value, or `None` when out of range.
    pub fn toggle_highlighted(&mut self, index: usize) -> Option<bool> {
        let cell = self.grid.cell_mut(index)?;
        cell.is_highlighted = !cell.is_highlighted;
        Some(cell.is_highlighted)
    }

    /// Sets or clears the color override.
    ///
    /// Returns `false` without changes for out-of-range cells and colors
    /// that are not hex literals.
    pub fn set_color(&mut self, index: usize, color: Option<&str>) -> bool {
        let color = match color.map(str::trim) {
            Some(value) if is_color_literal(value) => Some(value.to_ascii_lowercase()),
            Some(_) => {
                debug!(
                    "event=grid_color module=grid status=noop reason=invalid_color cell_index={index}"
                );
                return false;
            }
            None => None,
        };
        match self.grid.cell_mut(index) {
            Some(cell) => {
                cell.color = color;
                true
            }
            None => false,
        }
    }

    /// Background painted over a completed cell at `index`.
    ///
    /// Uses the palette entry of the center-block cell governing the cell's
    /// block, ignoring overrides.
    pub fn representative_color(&self, index: usize) -> &'static str {
        self.representative_palette(index)
            .map_or(DEFAULT_BACKGROUND, |entry| entry.background)
    }

    /// Resolves `(background, text_color)` for one cell.
    pub fn cell_colors(&self, index: usize) -> Option<(String, String)> {
        let cell = self.grid.cell(index)?;
        let palette = self.palette_for(index);
        let text_color = palette.map_or(DEFAULT_TEXT_COLOR, |entry| entry.text_color);

        if cell.is_completed {
            let representative = self.representative_palette(index);
            return Some((
                representative.map_or(DEFAULT_BACKGROUND, |entry| entry.background).to_string(),
                representative
                    .map_or(DEFAULT_TEXT_COLOR, |entry| entry.text_color)
                    .to_string(),
            ));
        }
        if let Some(color) = &cell.color {
            return Some((color.clone(), text_color.to_string()));
        }
        Some((
            palette.map_or(DEFAULT_BACKGROUND, |entry| entry.background).to_string(),
            text_color.to_string(),
        ))
    }

    /// Re-applies mirrors and builds the render model for every cell.
    pub fn render(&mut self) -> Vec<RenderedCell> {
        self.sync_mirrors();
        self.grid
            .cells()
            .iter()
            .map(|cell| {
                let (background, text_color) = self.cell_colors(cell.index).unwrap_or_else(|| {
                    (DEFAULT_BACKGROUND.to_string(), DEFAULT_TEXT_COLOR.to_string())
                });
                RenderedCell {
                    index: cell.index,
                    element_id: cell.element_id(),
                    content: cell.content.clone(),
                    is_completed: cell.is_completed,
                    is_highlighted: cell.is_highlighted,
                    is_title: cell.index == TITLE_CELL_INDEX,
                    is_read_only: self.layout.is_read_only(cell.index),
                    background,
                    text_color,
                }
            })
            .collect()
    }

    fn palette_for(&self, index: usize) -> Option<CellPalette> {
        let key = self.layout.sync_source(index).unwrap_or(index);
        self.layout.palette_entry(key)
    }

    fn representative_palette(&self, index: usize) -> Option<CellPalette> {
        if index >= CELL_COUNT {
            return None;
        }
        self.layout.palette_entry(governing_topic_index(index))
    }

    /// Copies each source into its mirror and the title into the name.
    /// Returns how many cells had diverged.
    fn sync_mirrors(&mut self) -> usize {
        let mut repaired = 0;
        let pairs: Vec<(usize, usize)> = self.layout.sync_pairs().collect();
        for (source, target) in pairs {
            let Some(text) = self.grid.cell(source).map(|cell| cell.content.clone()) else {
                continue;
            };
            if let Some(mirror) = self.grid.cell_mut(target) {
                if mirror.content != text {
                    mirror.content = text;
                    repaired += 1;
                }
            }
        }
        let title = self
            .grid
            .cell(TITLE_CELL_INDEX)
            .map(|cell| cell.content.clone())
            .unwrap_or_default();
        if self.grid.name() != title {
            self.grid.set_name(title);
            repaired += 1;
        }
        repaired
    }
}

/// Owning collection of goal grids sharing one layout.
pub struct GridCollection {
    layout: GridLayout,
    grids: Vec<GoalGrid>,
}

impl GridCollection {
    /// Creates an empty collection.
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            grids: Vec::new(),
        }
    }

    /// Creates an empty collection using the standard layout.
    pub fn standard() -> Self {
        Self::new(GridLayout::standard().clone())
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Grid ids in insertion order.
    pub fn ids(&self) -> Vec<GoalGridId> {
        self.grids.iter().map(GoalGrid::id).collect()
    }

    pub fn get(&self, grid_id: GoalGridId) -> Option<&GoalGrid> {
        self.grids.iter().find(|grid| grid.id() == grid_id)
    }

    /// Creates an empty grid, optionally titled through the title cell.
    pub fn create_grid(&mut self, name: Option<&str>) -> GoalGridId {
        let mut grid = GoalGrid::new();
        if let Some(name) = name {
            let mut view = GoalGridView::mount(&mut grid, &self.layout);
            view.edit_cell_at(TITLE_CELL_INDEX, name);
        }
        let grid_id = grid.id();
        self.grids.push(grid);
        info!("event=grid_create module=grid status=ok");
        grid_id
    }

    /// Adds an existing grid. Returns `false` if the id is already present.
    pub fn insert(&mut self, grid: GoalGrid) -> bool {
        if self.get(grid.id()).is_some() {
            return false;
        }
        self.grids.push(grid);
        true
    }

    /// Mounts one grid for editing. Unknown ids return `None`.
    pub fn mount(&mut self, grid_id: GoalGridId) -> Option<GoalGridView<'_>> {
        let layout = &self.layout;
        self.grids
            .iter_mut()
            .find(|grid| grid.id() == grid_id)
            .map(|grid| GoalGridView::mount(grid, layout))
    }

    /// Removes and returns one grid.
    pub fn remove_grid(&mut self, grid_id: GoalGridId) -> Option<GoalGrid> {
        let position = self.grids.iter().position(|grid| grid.id() == grid_id)?;
        info!("event=grid_remove module=grid status=ok");
        Some(self.grids.remove(position))
    }
}
