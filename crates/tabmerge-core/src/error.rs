//! Error types for tabmerge-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tabmerge-core
#[derive(Debug, Error)]
pub enum Error {
    /// Header row is empty or no id column name was given
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// A column name appears more than once in a header
    #[error("column name '{0}' is not unique")]
    DuplicateColumn(String),

    /// The id column was not found in the header
    #[error("id column '{0}' not found in header")]
    MissingIdColumn(String),

    /// Row length does not match the table's column count
    #[error("row has {found} cells, expected {expected}")]
    MalformedRow { expected: usize, found: usize },

    /// Row has no value in the id column
    #[error("row has no value in the id column")]
    MissingKey,

    /// Key already present in the table being built
    #[error("duplicate key '{0}'")]
    DuplicateKey(String),

    /// Failed to open or read an input file
    #[error("failed to read file '{path}': {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file extension is not recognized
    #[error("unknown or missing file type for '{0}'")]
    UnknownFileType(PathBuf),

    /// Output file extension is not a supported output format
    #[error("unsupported output file type for '{0}'")]
    UnsupportedOutputType(PathBuf),

    /// Output file exists but cannot be written
    #[error("output file '{0}' is write protected")]
    OutputNotWritable(PathBuf),

    /// Configuration is unusable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed HTML content
    #[error("failed to parse HTML '{path}': {message}")]
    HtmlParse { path: PathBuf, message: String },

    /// CSV error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
