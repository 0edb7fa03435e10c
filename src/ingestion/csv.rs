//! CSV reading.

use std::path::Path;

use crate::error::ImportResult;
use crate::types::CsvTable;

/// Read a CSV file into a [`CsvTable`].
///
/// Rules:
///
/// - The first record is the header.
/// - Every value is read as text, untouched (no trimming, no null coercion).
/// - Rows may have any number of fields here; arity is enforced when rows are loaded.
pub fn read_csv_from_path(path: impl AsRef<Path>) -> ImportResult<CsvTable> {
    let mut rdr = reader_builder().from_path(path)?;
    read_csv_from_reader(&mut rdr)
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> ImportResult<CsvTable> {
    let header = rdr.headers()?.iter().map(str::to_owned).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(CsvTable { header, rows })
}

/// Reader settings shared by every source file.
pub fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(csv::Trim::None);
    builder
}
