use planboard_core::model::goal_grid::{STANDARD_CELL_PALETTE, STANDARD_SYNC_MAP};
use planboard_core::model::palette::{
    resolve_color, PaletteColor, DEFAULT_BACKGROUND, DEFAULT_TEXT_COLOR,
};
use planboard_core::{
    GoalGrid, GoalGridView, GridCollection, GridConfigError, GridLayout, CELL_COUNT,
    TITLE_CELL_INDEX,
};
use proptest::prelude::*;

fn single_pair_layout() -> GridLayout {
    GridLayout::try_new(&[(30, 10)], &STANDARD_CELL_PALETTE).unwrap()
}

#[test]
fn topic_edit_propagates_and_mirror_edit_is_refused() {
    let layout = single_pair_layout();
    let mut grid = GoalGrid::new();
    let mut view = GoalGridView::mount(&mut grid, &layout);

    let outcome = view.edit_cell_at(30, "Buy milk").unwrap();
    assert_eq!(outcome.mirrored_to, Some(10));
    assert!(!outcome.renamed);
    assert_eq!(view.grid().cell(30).unwrap().content, "Buy milk");
    assert_eq!(view.grid().cell(10).unwrap().content, "Buy milk");

    assert!(view.editable(10).is_none());
    assert!(view.edit_cell_at(10, "ignored").is_none());
    assert_eq!(view.grid().cell(10).unwrap().content, "Buy milk");
    assert_eq!(view.grid().cell(30).unwrap().content, "Buy milk");
}

#[test]
fn every_mirror_tracks_its_topic_after_edits() {
    let mut grid = GoalGrid::new();
    let mut view = GoalGridView::mount(&mut grid, GridLayout::standard());

    for (round, (source, _)) in STANDARD_SYNC_MAP.iter().enumerate() {
        view.edit_cell_at(*source, format!("topic {round}")).unwrap();
        view.edit_cell_at(0, "outer note").unwrap();
        for (source, target) in STANDARD_SYNC_MAP {
            assert_eq!(
                view.grid().cell(target).unwrap().content,
                view.grid().cell(source).unwrap().content
            );
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn mirrors_equal_sources_after_any_edit_sequence(
        edits in prop::collection::vec((0usize..CELL_COUNT + 5, "[a-z ]{0,12}"), 0..40)
    ) {
        let layout = GridLayout::standard();
        let mut grid = GoalGrid::new();
        let mut view = GoalGridView::mount(&mut grid, layout);

        for (index, text) in edits {
            let accepted = view.edit_cell_at(index, text.clone()).is_some();
            prop_assert_eq!(accepted, index < CELL_COUNT && !layout.is_read_only(index));
            if accepted {
                prop_assert_eq!(&view.grid().cell(index).unwrap().content, &text);
            }

            for (source, target) in STANDARD_SYNC_MAP {
                prop_assert_eq!(
                    &view.grid().cell(target).unwrap().content,
                    &view.grid().cell(source).unwrap().content
                );
            }
            prop_assert_eq!(
                view.grid().name(),
                view.grid().cell(TITLE_CELL_INDEX).unwrap().content.as_str()
            );
        }
    }
}

#[test]
fn title_edit_renames_grid_without_truncation() {
    let mut grid = GoalGrid::new();
    let mut view = GoalGridView::mount(&mut grid, GridLayout::standard());
    let long_name = "Become a better engineer in 2026 ".repeat(20);

    let outcome = view.edit_cell_at(TITLE_CELL_INDEX, long_name.clone()).unwrap();
    assert!(outcome.renamed);
    assert_eq!(outcome.mirrored_to, None);
    assert_eq!(view.grid().name(), long_name);
    assert_eq!(view.grid().cell(TITLE_CELL_INDEX).unwrap().content, long_name);
}

#[test]
fn representative_color_is_pure_and_title_maps_to_itself() {
    let mut grid = GoalGrid::new();
    let mut view = GoalGridView::mount(&mut grid, GridLayout::standard());
    let title_background = GridLayout::standard()
        .palette_entry(TITLE_CELL_INDEX)
        .unwrap()
        .background;

    assert_eq!(view.representative_color(TITLE_CELL_INDEX), title_background);
    assert_eq!(
        view.representative_color(TITLE_CELL_INDEX),
        view.representative_color(TITLE_CELL_INDEX)
    );

    // Overrides and completion never affect the representative color.
    view.set_color(30, Some("#000000"));
    view.toggle_completed(30);
    assert_eq!(view.representative_color(0), "#ffadad");
    assert_eq!(view.representative_color(80), "#ffc6ff");
}

#[test]
fn completed_color_beats_override_beats_palette() {
    let mut grid = GoalGrid::new();
    let mut view = GoalGridView::mount(&mut grid, GridLayout::standard());

    // Plain outer cell: default colors.
    assert_eq!(
        view.cell_colors(0).unwrap(),
        (DEFAULT_BACKGROUND.to_string(), DEFAULT_TEXT_COLOR.to_string())
    );

    // Topic cell: palette entry.
    assert_eq!(view.cell_colors(31).unwrap().0, "#ffd6a5");

    // Mirror cell: palette of its source.
    assert_eq!(view.cell_colors(13).unwrap().0, "#ffd6a5");

    // Override wins over palette.
    assert!(view.set_color(31, Some("#123456")));
    assert_eq!(view.cell_colors(31).unwrap().0, "#123456");

    // Completion wins over override; outer block (0, 1) is governed by 31.
    assert!(view.set_color(12, Some("#654321")));
    assert_eq!(view.toggle_completed(12), Some(true));
    assert_eq!(view.cell_colors(12).unwrap().0, "#ffd6a5");

    // Un-completing restores the override.
    assert_eq!(view.toggle_completed(12), Some(false));
    assert_eq!(view.cell_colors(12).unwrap().0, "#654321");
}

#[test]
fn every_resolved_color_is_accepted_as_override() {
    let palette = vec![
        PaletteColor::new("Mint", "#C8F7DC"),
        PaletteColor::new("red", "rgb(255, 0, 0)"),
        PaletteColor::new("blank", ""),
    ];
    let mut grid = GoalGrid::new();
    let mut view = GoalGridView::mount(&mut grid, GridLayout::standard());

    for value in ["mint", "red", "blank", "#FFF", "#12345", "teal"] {
        if let Some(color) = resolve_color(&palette, value) {
            assert!(view.set_color(0, Some(&color)), "rejected {color}");
            assert_eq!(view.grid().cell(0).unwrap().color.as_deref(), Some(color.as_str()));
        }
    }
    assert_eq!(resolve_color(&palette, "red"), None);
    assert_eq!(view.grid().cell(0).unwrap().color.as_deref(), Some("#fff"));
}

#[test]
fn toggles_flip_without_propagation() {
    let mut grid = GoalGrid::new();
    let mut view = GoalGridView::mount(&mut grid, GridLayout::standard());

    assert_eq!(view.toggle_highlighted(30), Some(true));
    assert_eq!(view.toggle_completed(30), Some(true));
    assert!(!view.grid().cell(10).unwrap().is_highlighted);
    assert!(!view.grid().cell(10).unwrap().is_completed);
    assert_eq!(view.toggle_highlighted(30), Some(false));
    assert_eq!(view.toggle_completed(CELL_COUNT), None);
    assert_eq!(view.grid().completed_count(), 1);
}

#[test]
fn render_flags_title_and_read_only_cells() {
    let mut grid = GoalGrid::new();
    let mut view = GoalGridView::mount(&mut grid, GridLayout::standard());
    view.edit_cell_at(49, "Health").unwrap();

    let cells = view.render();
    assert_eq!(cells.len(), CELL_COUNT);
    assert!(cells[TITLE_CELL_INDEX].is_title);
    assert!(cells[67].is_read_only);
    assert_eq!(cells[67].content, "Health");
    assert_eq!(cells[67].element_id, "cell-67");
    assert!(!cells[49].is_read_only);
}

#[test]
fn out_of_range_sync_table_fails_at_initialization() {
    let err = GridLayout::try_new(&[(30, 10), (31, 200)], &[]).unwrap_err();
    assert_eq!(
        err,
        GridConfigError::SyncTargetOutOfRange {
            source: 31,
            target: 200
        }
    );
    assert!(err.to_string().contains("200"));
}

#[test]
fn collection_creates_mounts_and_removes_grids() {
    let mut collection = GridCollection::standard();
    let first = collection.create_grid(Some("2026 goals"));
    let second = collection.create_grid(None);
    assert_eq!(collection.ids(), vec![first, second]);
    assert_eq!(collection.get(first).unwrap().name(), "2026 goals");
    assert_eq!(
        collection
            .get(first)
            .unwrap()
            .cell(TITLE_CELL_INDEX)
            .unwrap()
            .content,
        "2026 goals"
    );

    {
        let mut view = collection.mount(second).unwrap();
        view.edit_cell_at(32, "Reading").unwrap();
    }
    assert_eq!(collection.get(second).unwrap().cell(16).unwrap().content, "Reading");

    let removed = collection.remove_grid(first).unwrap();
    assert_eq!(removed.name(), "2026 goals");
    assert!(collection.get(first).is_none());
    assert!(collection.mount(first).is_none());
    assert!(!collection.insert(collection.get(second).unwrap().clone()));
    assert!(collection.insert(removed));
}
