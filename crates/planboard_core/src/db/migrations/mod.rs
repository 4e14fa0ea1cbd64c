//! Planner schema history.
//!
//! # Invariants
//! - Versions start at 1 and increase by one per step.
//! - A step never edits data written by a later step.
//! - All pending steps run in one transaction; a failed step leaves the
//!   previous version in place.

use crate::db::schema::schema_version;
use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;
use std::cmp::Ordering;

struct SchemaStep {
    version: u32,
    /// What the step adds, for logs.
    adds: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        adds: "task_sequence",
        sql: include_str!("0001_task_items.sql"),
    },
    SchemaStep {
        version: 2,
        adds: "goal_grids",
        sql: include_str!("0002_goal_grids.sql"),
    },
    SchemaStep {
        version: 3,
        adds: "color_palette",
        sql: include_str!("0003_palette_colors.sql"),
    },
];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the planner schema on `conn` up to `latest_version()`.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file is newer than this build.
/// - `DbError::Sqlite` when a step fails; nothing from the batch is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();
    match from_version.cmp(&latest) {
        Ordering::Greater => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: from_version,
                latest_supported: latest,
            })
        }
        Ordering::Equal => return Ok(()),
        Ordering::Less => {}
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > from_version) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} adds={}",
            step.version, step.adds
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version, latest
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, SCHEMA_STEPS};
    use crate::db::schema_version;
    use rusqlite::Connection;

    #[test]
    fn steps_are_contiguous_from_one() {
        for (position, step) in SCHEMA_STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, position + 1, "step `{}`", step.adds);
        }
        assert_eq!(latest_version(), SCHEMA_STEPS.len() as u32);
    }

    #[test]
    fn upgrade_from_task_only_schema_keeps_tasks_and_seeds_palette() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA_STEPS[0].sql).unwrap();
        conn.execute_batch("PRAGMA user_version = 1;").unwrap();
        conn.execute(
            "INSERT INTO task_items (item_uuid, text, priority, sort_order)
             VALUES ('kept', 'call dentist', 2, 0);",
            [],
        )
        .unwrap();

        apply_migrations(&mut conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), latest_version());
        let tasks: i64 = conn
            .query_row("SELECT COUNT(*) FROM task_items;", [], |row| row.get(0))
            .unwrap();
        let colors: i64 = conn
            .query_row("SELECT COUNT(*) FROM palette_colors;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(tasks, 1);
        assert_eq!(colors, 8);
    }

    #[test]
    fn failing_step_rolls_back_to_previous_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA_STEPS[0].sql).unwrap();
        conn.execute_batch("PRAGMA user_version = 1;").unwrap();
        // Pre-existing table without `color_value` makes the step 3 seed fail.
        conn.execute_batch("CREATE TABLE palette_colors (name TEXT PRIMARY KEY);")
            .unwrap();

        assert!(apply_migrations(&mut conn).is_err());
        assert_eq!(schema_version(&conn).unwrap(), 1);
        let grid_tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'goal_grids';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(grid_tables, 0);
    }
}
