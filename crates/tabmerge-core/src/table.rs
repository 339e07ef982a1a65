//! Keyed table used for parsed inputs and the merge accumulator

use crate::error::{Error, Result};
use std::collections::{btree_map, BTreeMap, HashMap};
use std::fmt;

/// A single cell. `None` is an absent value.
pub type Cell = Option<String>;

/// Returns true when a cell is absent or holds the empty string
pub fn is_blank(cell: &Cell) -> bool {
    cell.as_deref().map_or(true, str::is_empty)
}

/// A table with named columns and rows indexed by the id column value
///
/// Rows are kept sorted by key so iteration and output are deterministic.
/// Every row has exactly one cell per column, and the cell at the id column
/// always equals the row's key.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column names in insertion order
    columns: Vec<String>,
    /// Column name -> position
    column_index: HashMap<String, usize>,
    /// Position of the id column
    id_index: usize,
    /// Rows keyed by id value
    rows: BTreeMap<String, Vec<Cell>>,
}

impl Table {
    /// Create an empty table from a header row
    ///
    /// The id column is matched case-insensitively, preferring a column whose
    /// name matches `id_column` exactly.
    pub fn new<S: AsRef<str>>(column_names: &[S], id_column: &str) -> Result<Self> {
        if column_names.is_empty() {
            return Err(Error::InvalidHeader("header has no columns".to_string()));
        }
        if id_column.is_empty() {
            return Err(Error::InvalidHeader(
                "name of the id column must be provided".to_string(),
            ));
        }

        let mut columns = Vec::with_capacity(column_names.len());
        let mut column_index = HashMap::with_capacity(column_names.len());
        let mut exact = None;
        let mut folded = None;

        for (i, name) in column_names.iter().enumerate() {
            let name = name.as_ref();
            if column_index.contains_key(name) {
                return Err(Error::DuplicateColumn(name.to_string()));
            }
            if name == id_column {
                exact = Some(i);
            } else if folded.is_none() && name.eq_ignore_ascii_case(id_column) {
                folded = Some(i);
            }
            column_index.insert(name.to_string(), i);
            columns.push(name.to_string());
        }

        let id_index = exact
            .or(folded)
            .ok_or_else(|| Error::MissingIdColumn(id_column.to_string()))?;

        Ok(Self {
            columns,
            column_index,
            id_index,
            rows: BTreeMap::new(),
        })
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in display order
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column, `None` if the name is unknown
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    pub fn id_column_index(&self) -> usize {
        self.id_index
    }

    /// Name of the id column as spelled in the header
    pub fn id_column_name(&self) -> &str {
        &self.columns[self.id_index]
    }

    /// Get a row by key
    pub fn get(&self, key: &str) -> Option<&[Cell]> {
        self.rows.get(key).map(Vec::as_slice)
    }

    /// Get a single cell value, `None` if the row, column, or value is absent
    pub fn cell(&self, key: &str, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(key)?.get(idx)?.as_deref()
    }

    /// Append a column, backfilling existing rows with absent cells
    ///
    /// Returns false if the name is empty or already present.
    pub fn add_column(&mut self, name: &str) -> bool {
        if name.is_empty() {
            tracing::debug!("refusing to add a column without a name");
            return false;
        }
        if self.column_index.contains_key(name) {
            tracing::debug!(column = name, "column already exists");
            return false;
        }

        self.column_index.insert(name.to_string(), self.columns.len());
        self.columns.push(name.to_string());
        for cells in self.rows.values_mut() {
            cells.push(None);
        }
        true
    }

    /// Insert a new row keyed by its id column value
    ///
    /// The first row seen for a key wins; later rows with the same key are
    /// rejected with [`Error::DuplicateKey`].
    pub fn add_row(&mut self, values: Vec<Cell>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::MalformedRow {
                expected: self.columns.len(),
                found: values.len(),
            });
        }

        let key = match values[self.id_index].as_deref() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Err(Error::MissingKey),
        };

        match self.rows.entry(key) {
            btree_map::Entry::Occupied(entry) => Err(Error::DuplicateKey(entry.key().clone())),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(values);
                Ok(())
            }
        }
    }

    /// Set one cell, keeping any existing non-empty value
    ///
    /// An unseen key creates a new row holding only the key and this value.
    /// Returns false if the key or column is empty or the column is unknown.
    pub fn upsert_cell(&mut self, key: &str, column: &str, value: Cell) -> bool {
        if key.is_empty() || column.is_empty() {
            return false;
        }
        let Some(idx) = self.column_index(column) else {
            return false;
        };

        match self.rows.get_mut(key) {
            Some(cells) => {
                if is_blank(&cells[idx]) {
                    cells[idx] = value;
                }
            }
            None => {
                let mut cells: Vec<Cell> = vec![None; self.columns.len()];
                if idx != self.id_index {
                    cells[idx] = value;
                }
                cells[self.id_index] = Some(key.to_string());
                self.rows.insert(key.to_string(), cells);
            }
        }
        true
    }

    /// Iterate rows in ascending key order
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            inner: self.rows.iter(),
        }
    }

    /// Iterate one column's values row by row, in ascending key order
    pub fn column_values(&self, column: &str) -> Option<ColumnValues<'_>> {
        let index = self.column_index(column)?;
        Some(ColumnValues {
            inner: self.rows.iter(),
            index,
        })
    }
}

/// Read-only iterator over `(key, cells)` pairs
pub struct Rows<'a> {
    inner: btree_map::Iter<'a, String, Vec<Cell>>,
}

impl<'a> Iterator for Rows<'a> {
    type Item = (&'a str, &'a [Cell]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, cells)| (key.as_str(), cells.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Rows<'_> {}

/// Read-only iterator over `(key, value)` pairs for a single column
pub struct ColumnValues<'a> {
    inner: btree_map::Iter<'a, String, Vec<Cell>>,
    index: usize,
}

impl<'a> Iterator for ColumnValues<'a> {
    type Item = (&'a str, &'a Cell);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, cells)| (key.as_str(), &cells[self.index]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ColumnValues<'_> {}

/// Tab-separated rendering for diagnostics, not the CSV output format
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.columns.join("\t"))?;
        for (_, cells) in self.rows() {
            let values: Vec<&str> = cells.iter().map(|c| c.as_deref().unwrap_or("")).collect();
            write!(f, "\n{}", values.join("\t"))?;
        }
        Ok(())
    }
}
