//! File type detection from file name extensions

use serde::Serialize;
use std::path::Path;

/// Recognized input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFileType {
    Csv,
    Html,
    Unknown,
}

impl InputFileType {
    /// Detect the input type from a path's extension, ignoring case
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match extension(path.as_ref()).as_deref() {
            Some("csv") => InputFileType::Csv,
            Some("html") => InputFileType::Html,
            _ => InputFileType::Unknown,
        }
    }
}

/// Recognized output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFileType {
    Csv,
    Unknown,
}

impl OutputFileType {
    /// Detect the output type from a path's extension, ignoring case
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match extension(path.as_ref()).as_deref() {
            Some("csv") => OutputFileType::Csv,
            _ => OutputFileType::Unknown,
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_types() {
        assert_eq!(InputFileType::from_path("data.csv"), InputFileType::Csv);
        assert_eq!(InputFileType::from_path("dir/Data.CSV"), InputFileType::Csv);
        assert_eq!(InputFileType::from_path("page.html"), InputFileType::Html);
        assert_eq!(InputFileType::from_path("page.HTML"), InputFileType::Html);
        assert_eq!(InputFileType::from_path("page.htm"), InputFileType::Unknown);
        assert_eq!(InputFileType::from_path("notes.txt"), InputFileType::Unknown);
        assert_eq!(InputFileType::from_path("README"), InputFileType::Unknown);
        assert_eq!(InputFileType::from_path(".csv"), InputFileType::Unknown);
    }

    #[test]
    fn test_output_types() {
        assert_eq!(OutputFileType::from_path("combined.csv"), OutputFileType::Csv);
        assert_eq!(OutputFileType::from_path("combined.Csv"), OutputFileType::Csv);
        assert_eq!(OutputFileType::from_path("combined.html"), OutputFileType::Unknown);
        assert_eq!(OutputFileType::from_path("combined"), OutputFileType::Unknown);
    }
}
