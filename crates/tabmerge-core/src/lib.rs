//! tabmerge-core: Core library for merging tables keyed by an identifier column
//!
//! This library provides functionality to:
//! - Parse CSV files and HTML tables into keyed tables
//! - Merge tables with a fixed first-writer-wins policy, where a non-empty
//!   value always beats an absent or empty one
//! - Write the merged table back out as CSV
//! - Drive a whole run from a list of input files and a [`MergeConfig`]

pub mod config;
pub mod error;
pub mod file_type;
pub mod html;
pub mod merger;
pub mod orchestrator;
pub mod parser;
pub mod table;
pub mod writer;

pub use config::MergeConfig;
pub use error::{Error, Result};
pub use file_type::{InputFileType, OutputFileType};
pub use html::{parse_html, parse_html_str};
pub use merger::{merge_tables, Merger};
pub use orchestrator::{InputReport, InputStatus, MergeReport, RecordMerger};
pub use parser::{parse_csv, parse_csv_str};
pub use table::{Cell, ColumnValues, Rows, Table};
pub use writer::{write_csv, write_csv_to};
