//! Local planner store: connection bootstrap, migrations and schema checks.
//!
//! # Responsibility
//! - Hand out SQLite connections that already carry the planner schema.
//! - Tell repositories, before their first query, whether a connection
//!   can back them.
//!
//! # Invariants
//! - The planner schema version lives in `PRAGMA user_version` and equals
//!   `migrations::latest_version()` on every connection this module opens.
//! - A database written by a newer planner is never downgraded or touched.
//! - Repositories report schema gaps as `DbError` values, not as SQL
//!   failures from their first statement.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{ensure_schema_ready, schema_version};

pub type DbResult<T> = Result<T, DbError>;

/// Failure opening, migrating or validating the planner store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Database file was migrated by a newer planner build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Connection was not opened through `open_db`, or is mid-upgrade.
    SchemaNotReady { expected: u32, actual: u32 },
    /// A table a repository depends on is absent.
    MissingTable(&'static str),
    /// A column a repository reads or writes is absent.
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "planner database is at schema {db_version}; this build reads up to {latest_supported}"
            ),
            Self::SchemaNotReady { expected, actual } => write!(
                f,
                "planner schema {actual} is not ready; open the database with open_db to reach {expected}"
            ),
            Self::MissingTable(table) => write!(f, "planner table `{table}` is missing"),
            Self::MissingColumn { table, column } => {
                write!(f, "planner table `{table}` has no column `{column}`")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl DbError {
    /// Whether the error means the schema, not the SQL engine, is wrong.
    pub fn is_schema_mismatch(&self) -> bool {
        !matches!(self, Self::Sqlite(_))
    }
}
