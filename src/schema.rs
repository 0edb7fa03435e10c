//! Table schema derivation from a file header.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ImportError, ImportResult};
use crate::sanitize::{sanitize_identifier, validate_identifier};
use crate::store::ledger::LEDGER_TABLE;
use crate::types::TableSchema;

/// Derive the target table name and column list for `file_name`.
///
/// - table name: sanitized file stem (everything before the last `.`)
/// - columns: sanitized header names, in header order
///
/// Fails with [`ImportError::EmptyHeader`] when `header` has no columns and with
/// [`ImportError::DuplicateColumn`] when two header names collide after sanitization.
/// Collisions are detected case-insensitively since the store resolves identifiers that way.
pub fn build_schema<S: AsRef<str>>(file_name: &str, header: &[S]) -> ImportResult<TableSchema> {
    if header.is_empty() {
        return Err(ImportError::EmptyHeader {
            file: file_name.to_string(),
        });
    }

    let table_name = sanitize_identifier(&file_stem(file_name));
    validate_identifier(&table_name)?;
    if table_name.eq_ignore_ascii_case(LEDGER_TABLE) {
        return Err(ImportError::InvalidIdentifier {
            name: table_name,
            reason: "identifier is reserved for the import ledger".to_string(),
        });
    }

    let mut seen: HashMap<String, &str> = HashMap::with_capacity(header.len());
    let mut columns = Vec::with_capacity(header.len());
    for raw in header {
        let raw = raw.as_ref();
        let column = sanitize_identifier(raw);
        validate_identifier(&column)?;
        if let Some(first) = seen.insert(column.to_ascii_lowercase(), raw) {
            return Err(ImportError::DuplicateColumn {
                column,
                first: first.to_string(),
                second: raw.to_string(),
            });
        }
        columns.push(column);
    }

    Ok(TableSchema {
        table_name,
        columns,
    })
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}
