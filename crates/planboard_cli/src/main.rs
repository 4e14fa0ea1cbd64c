//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `planboard_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use planboard_core::{GridLayout, Quadrant, TITLE_CELL_INDEX};

fn main() {
    println!("planboard_core ping={}", planboard_core::ping());
    println!("planboard_core version={}", planboard_core::core_version());

    for quadrant in Quadrant::ALL {
        println!(
            "quadrant id={} priority={}",
            quadrant.id(),
            quadrant.priority()
        );
    }

    let layout = GridLayout::standard();
    println!("goal_grid title_cell={TITLE_CELL_INDEX}");
    for (source, target) in layout.sync_pairs() {
        println!("goal_grid sync source={source} target={target}");
    }
}
