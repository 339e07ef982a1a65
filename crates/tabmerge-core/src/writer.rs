//! CSV writer for merged tables

use crate::error::{Error, Result};
use crate::table::Table;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write a table to a CSV file
///
/// The header row lists columns in table order, followed by one record per
/// row in ascending key order. Absent cells are written as empty fields.
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_records(table, BufWriter::new(file)).map_err(|e| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a table as CSV to any writer
pub fn write_csv_to<W: Write>(table: &Table, writer: W) -> Result<()> {
    write_records(table, writer).map_err(|e| Error::Csv {
        path: PathBuf::from("<writer>"),
        source: e,
    })
}

fn write_records<W: Write>(table: &Table, writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(table.column_names())?;
    for (_, cells) in table.rows() {
        csv_writer.write_record(cells.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }

    csv_writer.flush()?;
    Ok(())
}
