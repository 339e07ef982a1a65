//! Merge engine folding tables into a single accumulator
//!
//! Tables are merged in the order they are supplied. Values already in the
//! accumulator win over incoming values; an absent or empty accumulator cell
//! is filled from the incoming table.

use crate::error::Result;
use crate::table::Table;

/// Accumulates tables into one merged table
#[derive(Debug, Default)]
pub struct Merger {
    merged: Option<Table>,
}

impl Merger {
    /// Create a merger with no accumulator yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one table into the accumulator
    ///
    /// The first table seeds the accumulator with its header and rows. Later
    /// tables add any new columns and then write each of their cells through
    /// [`Table::upsert_cell`].
    pub fn merge(&mut self, table: &Table) -> Result<()> {
        match self.merged.as_mut() {
            None => {
                let mut seed = Table::new(table.column_names(), table.id_column_name())?;
                for (_, cells) in table.rows() {
                    seed.add_row(cells.to_vec())?;
                }
                self.merged = Some(seed);
            }
            Some(merged) => merge_into(merged, table),
        }
        Ok(())
    }

    /// The merged table, if any table has been merged
    pub fn merged_table(&self) -> Option<&Table> {
        self.merged.as_ref()
    }

    /// Consume the merger and return the merged table
    pub fn into_merged(self) -> Option<Table> {
        self.merged
    }
}

fn merge_into(merged: &mut Table, table: &Table) {
    for column in table.column_names() {
        if !merged.has_column(column) {
            merged.add_column(column);
        }

        if let Some(values) = table.column_values(column) {
            for (key, value) in values {
                merged.upsert_cell(key, column, value.clone());
            }
        }
    }
}

/// Merge a sequence of tables, skipping absent ones
///
/// Returns `None` if no table was merged.
pub fn merge_tables<I>(tables: I) -> Option<Table>
where
    I: IntoIterator<Item = Option<Table>>,
{
    let mut merger = Merger::new();
    for (position, table) in tables.into_iter().enumerate() {
        let Some(table) = table else {
            continue;
        };
        if let Err(e) = merger.merge(&table) {
            tracing::warn!(position, error = %e, "failed to merge table, skipping it");
        }
    }
    merger.into_merged()
}
