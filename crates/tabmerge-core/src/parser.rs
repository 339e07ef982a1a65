//! CSV reader producing keyed tables

use crate::error::{Error, Result};
use crate::table::{Cell, Table};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Parse a CSV file into a Table keyed by `id_column`
///
/// The first record is the header. Rows that cannot be added (wrong cell
/// count, missing or duplicate key) are logged and skipped.
pub fn parse_csv<P: AsRef<Path>>(path: P, id_column: &str) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::UnreadableFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    read_csv(BufReader::new(file), path, id_column)
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str, id_column: &str) -> Result<Table> {
    read_csv(content.as_bytes(), Path::new(source_name), id_column)
}

fn read_csv<R: Read>(reader: R, path: &Path, id_column: &str) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // ragged rows are rejected by the table, not the reader
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;
    let names: Vec<&str> = headers.iter().collect();
    let mut table = Table::new(&names, id_column)?;

    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

        let cells: Vec<Cell> = record.iter().map(|v| Some(v.to_string())).collect();
        push_row(&mut table, cells, path, row_idx + 1);
    }

    Ok(table)
}

/// Add a parsed row, logging and dropping it if the table rejects it
pub(crate) fn push_row(table: &mut Table, cells: Vec<Cell>, path: &Path, row: usize) {
    let snapshot = tracing::enabled!(tracing::Level::WARN).then(|| cells.clone());
    if let Err(e) = table.add_row(cells) {
        tracing::warn!(
            file = %path.display(),
            row,
            cells = ?snapshot.unwrap_or_default(),
            "skipping row: {e}"
        );
    }
}
