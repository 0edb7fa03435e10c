//! The import ledger: one row per successfully imported source file.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{ImportError, ImportResult};
use crate::types::LedgerEntry;

/// Name of the ledger table.
pub const LEDGER_TABLE: &str = "ImportedFiles";

/// Create the ledger table if it does not exist. Never touches existing rows.
pub fn ensure_exists(conn: &Connection) -> ImportResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS ImportedFiles (
            FileName TEXT NOT NULL PRIMARY KEY,
            ImportedDate DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );",
    )?;
    Ok(())
}

/// Whether `file_name` has already been imported.
pub fn is_imported(conn: &Connection, file_name: &str) -> ImportResult<bool> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM ImportedFiles WHERE FileName = ?1",
            params![file_name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}

/// Record `file_name` as imported, stamped with the current UTC time.
///
/// Must be called exactly once per file, after its rows are fully loaded. A second call
/// for the same name fails with [`ImportError::DuplicateKey`].
pub fn mark_imported(conn: &Connection, file_name: &str) -> ImportResult<()> {
    let now = Utc::now().naive_utc();
    conn.execute(
        "INSERT INTO ImportedFiles (FileName, ImportedDate) VALUES (?1, ?2)",
        params![file_name, now],
    )
    .map_err(|err| match ImportError::from(err) {
        ImportError::ConstraintViolation { .. } => ImportError::DuplicateKey {
            file: file_name.to_string(),
        },
        other => other,
    })?;
    Ok(())
}

/// All ledger entries, ordered by file name.
pub fn entries(conn: &Connection) -> ImportResult<Vec<LedgerEntry>> {
    let mut stmt =
        conn.prepare("SELECT FileName, ImportedDate FROM ImportedFiles ORDER BY FileName")?;
    let rows = stmt.query_map([], |row| {
        Ok(LedgerEntry {
            file_name: row.get(0)?,
            imported_at: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
