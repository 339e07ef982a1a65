//! HTML table reader
//!
//! Reads the first `<table>` in the document body. The first row of that
//! table supplies the header from its `<th>` cells and every following row
//! supplies data from its `<td>` cells. Rows of nested tables are ignored.

use crate::error::{Error, Result};
use crate::parser::push_row;
use crate::table::{Cell, Table};
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::Path;

/// Parse the first table of an HTML file into a Table keyed by `id_column`
pub fn parse_html<P: AsRef<Path>>(path: P, id_column: &str) -> Result<Table> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::UnreadableFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_html_str(&content, &path.to_string_lossy(), id_column)
}

/// Parse HTML from a string (useful for testing)
pub fn parse_html_str(content: &str, source_name: &str, id_column: &str) -> Result<Table> {
    let path = Path::new(source_name);
    let document = Html::parse_document(content);

    let table_sel = selector("body table", path)?;
    let row_sel = selector("tr", path)?;

    let table_el = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| Error::InvalidHeader(format!("no table found in {}", path.display())))?;

    let mut rows = table_el
        .select(&row_sel)
        .filter(|row| owning_table(*row).map(|t| t.id()) == Some(table_el.id()));

    let header: Vec<String> = rows
        .next()
        .map(|row| cell_texts(row, "th"))
        .unwrap_or_default();
    let mut table = Table::new(&header, id_column)?;

    for (row_idx, row) in rows.enumerate() {
        let cells: Vec<Cell> = cell_texts(row, "td").into_iter().map(Some).collect();
        push_row(&mut table, cells, path, row_idx + 1);
    }

    Ok(table)
}

fn selector(css: &str, path: &Path) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::HtmlParse {
        path: path.to_path_buf(),
        message: format!("invalid selector '{css}': {e:?}"),
    })
}

/// Nearest enclosing `<table>` of an element
fn owning_table(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

/// Whitespace-normalized text of the direct `tag` children of a row
fn cell_texts(row: ElementRef<'_>, tag: &str) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|c| c.value().name() == tag)
        .map(|c| {
            let text: String = c.text().collect();
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        })
        .collect()
}
