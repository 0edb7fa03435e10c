//! Data tables: materialization and bulk row loading.

use rusqlite::{Connection, params, params_from_iter};
use tracing::debug;

use super::quote_identifier;
use crate::error::{ImportError, ImportResult};

/// Result of [`ensure_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    /// The table did not exist and was created.
    Created,
    /// The table already existed and was left untouched.
    Existing,
}

pub fn table_exists(conn: &Connection, table_name: &str) -> ImportResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
        params![table_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Column names of an existing table, in declaration order. Empty if the table is absent.
pub fn table_columns(conn: &Connection, table_name: &str) -> ImportResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let rows = stmt.query_map(params![table_name], |row| row.get::<_, String>(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Create `table_name` with one `TEXT` column per entry of `columns` unless it exists.
///
/// An existing table is neither altered nor checked against `columns`; callers that care
/// about compatibility compare against [`table_columns`].
pub fn ensure_table(
    conn: &Connection,
    table_name: &str,
    columns: &[String],
) -> ImportResult<Materialized> {
    if table_exists(conn, table_name)? {
        debug!(table = table_name, "table already exists");
        return Ok(Materialized::Existing);
    }

    let col_defs = columns
        .iter()
        .map(|c| format!("{} TEXT", quote_identifier(c)))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {} ({col_defs})",
        quote_identifier(table_name)
    );
    conn.execute_batch(&sql)?;
    debug!(table = table_name, columns = columns.len(), "created table");
    Ok(Materialized::Created)
}

/// Insert every row into `table_name`, values bound positionally to `columns`.
///
/// Values are stored as given; an empty field stays an empty string. Fails with
/// [`ImportError::SchemaMismatch`] on the first row whose arity differs from `columns`.
/// Rows inserted before a failure stay visible unless the caller runs inside a transaction.
pub fn load_rows<R: AsRef<[String]>>(
    conn: &Connection,
    table_name: &str,
    columns: &[String],
    rows: &[R],
) -> ImportResult<usize> {
    let col_list = columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {} ({col_list}) VALUES ({placeholders})",
        quote_identifier(table_name)
    );

    let mut stmt = conn.prepare(&sql)?;
    for (idx, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != columns.len() {
            return Err(ImportError::schema_mismatch(format!(
                "data row {} has {} values but the table has {} columns",
                idx + 1,
                row.len(),
                columns.len()
            )));
        }
        stmt.execute(params_from_iter(row.iter()))?;
    }
    debug!(table = table_name, rows = rows.len(), "loaded rows");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::{Materialized, ensure_table, load_rows, table_columns, table_exists};
    use crate::error::ImportError;
    use crate::store::connect_in_memory;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ensure_table_creates_text_columns_in_order() {
        let conn = connect_in_memory().unwrap();
        let columns = cols(&["Order_ID", "Customer_Name"]);
        assert_eq!(
            ensure_table(&conn, "orders", &columns).unwrap(),
            Materialized::Created
        );
        assert!(table_exists(&conn, "orders").unwrap());
        assert_eq!(table_columns(&conn, "orders").unwrap(), columns);

        let types: Vec<String> = conn
            .prepare("SELECT type FROM pragma_table_info('orders')")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(types, vec!["TEXT", "TEXT"]);
    }

    #[test]
    fn ensure_table_leaves_existing_table_alone() {
        let conn = connect_in_memory().unwrap();
        ensure_table(&conn, "orders", &cols(&["a", "b"])).unwrap();
        assert_eq!(
            ensure_table(&conn, "orders", &cols(&["x"])).unwrap(),
            Materialized::Existing
        );
        assert_eq!(table_columns(&conn, "orders").unwrap(), cols(&["a", "b"]));
    }

    #[test]
    fn table_columns_of_missing_table_is_empty() {
        let conn = connect_in_memory().unwrap();
        assert!(table_columns(&conn, "nope").unwrap().is_empty());
        assert!(!table_exists(&conn, "nope").unwrap());
    }

    #[test]
    fn load_rows_keeps_values_as_raw_text() {
        let conn = connect_in_memory().unwrap();
        let columns = cols(&["id", "note"]);
        ensure_table(&conn, "t", &columns).unwrap();

        let rows = vec![row(&["007", ""]), row(&[" padded ", "NULL"])];
        assert_eq!(load_rows(&conn, "t", &columns, &rows).unwrap(), 2);

        let stored: Vec<(String, String)> = conn
            .prepare("SELECT id, note FROM t ORDER BY rowid")
            .unwrap()
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            stored,
            vec![
                ("007".to_string(), String::new()),
                (" padded ".to_string(), "NULL".to_string()),
            ]
        );
        let nulls: i64 = conn
            .query_row("SELECT COUNT(*) FROM t WHERE note IS NULL", [], |r| r.get(0))
            .unwrap();
        assert_eq!(nulls, 0);
    }

    #[test]
    fn load_rows_rejects_arity_mismatch() {
        let conn = connect_in_memory().unwrap();
        let columns = cols(&["a", "b"]);
        ensure_table(&conn, "t", &columns).unwrap();

        let rows = vec![row(&["1", "2"]), row(&["3"])];
        let err = load_rows(&conn, "t", &columns, &rows).unwrap_err();
        match err {
            ImportError::SchemaMismatch { message } => assert!(message.contains("data row 2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_rows_into_missing_table_is_a_store_error() {
        let conn = connect_in_memory().unwrap();
        let err = load_rows(&conn, "missing", &cols(&["a"]), &[row(&["1"])]).unwrap_err();
        assert!(matches!(err, ImportError::Database(_)));
    }
}
