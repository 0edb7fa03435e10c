//! SQLite-backed persistence: connection acquisition, the import ledger, and data tables.
//!
//! Every function takes a `&Connection`, so the same code runs against a plain connection
//! or inside a [`rusqlite::Transaction`] (which derefs to `Connection`).

pub mod ledger;
pub mod table;

use rusqlite::Connection;
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::error::ImportResult;

pub use ledger::LEDGER_TABLE;
pub use table::{Materialized, ensure_table, load_rows, table_columns, table_exists};

/// Open the database described by `config`.
///
/// The connection is released when the returned value is dropped.
pub fn connect(config: &DatabaseConfig) -> ImportResult<Connection> {
    debug!(path = %config.path.display(), "opening database");
    let conn = Connection::open(&config.path)?;
    conn.busy_timeout(config.busy_timeout)?;
    Ok(conn)
}

/// Open a private in-memory database (tests, dry runs).
pub fn connect_in_memory() -> ImportResult<Connection> {
    Ok(Connection::open_in_memory()?)
}

/// Quote an already sanitized identifier for use in a statement.
///
/// Callers must pass names produced by [`crate::sanitize::sanitize_identifier`]; those
/// contain no quote characters.
pub(crate) fn quote_identifier(name: &str) -> String {
    debug_assert!(
        name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        "unsanitized identifier reached the store: {name:?}"
    );
    format!("\"{name}\"")
}
