//! Schema readiness checks shared by repositories.
//!
//! # Invariants
//! - A repository is only constructed over a connection migrated to
//!   `latest_version()` that carries every table/column it touches.

use crate::db::migrations::latest_version;
use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Reads the planner schema version stored in `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Verifies schema version and the presence of `tables` with their columns.
pub fn ensure_schema_ready(
    conn: &Connection,
    tables: &[(&'static str, &[&'static str])],
) -> DbResult<()> {
    let expected = latest_version();
    let actual = schema_version(conn)?;
    if actual != expected {
        return Err(DbError::SchemaNotReady { expected, actual });
    }

    for &(table, columns) in tables {
        let present = table_columns(conn, table)?;
        if present.is_empty() {
            return Err(DbError::MissingTable(table));
        }
        if let Some(column) = columns
            .iter()
            .copied()
            .find(|column| !present.iter().any(|name| name.as_str() == *column))
        {
            return Err(DbError::MissingColumn { table, column });
        }
    }

    Ok(())
}

/// Column names of `table`; empty when the table does not exist.
fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
