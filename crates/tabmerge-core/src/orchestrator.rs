//! Drives a merge run: validate output, parse inputs, merge, write
//!
//! Per-file problems (unknown type, unreadable file, broken header) are
//! logged and the file is skipped. Only output validation and write failures
//! abort the run, and the output file is written only once every input has
//! been merged.

use crate::config::MergeConfig;
use crate::error::{Error, Result};
use crate::file_type::{InputFileType, OutputFileType};
use crate::html::parse_html;
use crate::merger::Merger;
use crate::parser::parse_csv;
use crate::table::Table;
use crate::writer::write_csv;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InputStatus {
    /// The file was parsed and merged
    Merged { rows: usize, columns: usize },
    /// The file was skipped
    Skipped { reason: String },
}

/// Report entry for one input file
#[derive(Debug, Clone, Serialize)]
pub struct InputReport {
    pub path: PathBuf,
    pub file_type: InputFileType,
    #[serde(flatten)]
    pub status: InputStatus,
}

/// Summary of a merge run
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    /// When the run finished
    pub generated_at: DateTime<Utc>,
    pub output_path: PathBuf,
    pub id_column: String,
    /// Inputs in discovery order, duplicates removed
    pub inputs: Vec<InputReport>,
    pub column_count: usize,
    pub row_count: usize,
    /// Whether the output file was written
    pub written: bool,
    /// The merged table, if anything was merged
    #[serde(skip)]
    pub merged: Option<Table>,
}

impl MergeReport {
    /// Number of inputs that were merged
    pub fn merged_count(&self) -> usize {
        self.inputs
            .iter()
            .filter(|i| matches!(i.status, InputStatus::Merged { .. }))
            .count()
    }

    /// Number of inputs that were skipped
    pub fn skipped_count(&self) -> usize {
        self.inputs.len() - self.merged_count()
    }

    /// Save the report as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Fail if `path` exists and this process cannot open it for writing
fn ensure_writable(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(Error::OutputNotWritable(path.to_path_buf())),
        // no create, no truncate: the existing contents stay untouched
        Ok(_) => fs::OpenOptions::new()
            .write(true)
            .open(path)
            .map(drop)
            .map_err(|_| Error::OutputNotWritable(path.to_path_buf())),
        Err(_) => Ok(()),
    }
}

/// Merges input files into one CSV according to a [`MergeConfig`]
#[derive(Debug, Clone)]
pub struct RecordMerger {
    config: MergeConfig,
}

impl RecordMerger {
    pub fn new(config: MergeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Check that the output is a CSV path that can be written
    pub fn validate_output(&self) -> Result<()> {
        let path = &self.config.output_path;

        if OutputFileType::from_path(path) != OutputFileType::Csv {
            return Err(Error::UnsupportedOutputType(path.clone()));
        }

        ensure_writable(path)
    }

    /// Deduplicate inputs in discovery order and detect their types
    pub fn discover_inputs<P: AsRef<Path>>(&self, files: &[P]) -> Vec<(PathBuf, InputFileType)> {
        let mut seen = HashSet::new();
        let mut inputs = Vec::new();

        for file in files {
            let path = file.as_ref();
            if path.as_os_str().is_empty() {
                continue;
            }
            if !seen.insert(path.to_path_buf()) {
                debug!(file = %path.display(), "ignoring duplicate input");
                continue;
            }
            inputs.push((path.to_path_buf(), InputFileType::from_path(path)));
        }

        inputs
    }

    /// Parse one input with the reader for its type
    pub fn parse_input(&self, path: &Path, file_type: InputFileType) -> Result<Table> {
        match file_type {
            InputFileType::Csv => parse_csv(path, &self.config.id_column),
            InputFileType::Html => parse_html(path, &self.config.id_column),
            InputFileType::Unknown => Err(Error::UnknownFileType(path.to_path_buf())),
        }
    }

    /// Run the whole pipeline over `files`
    pub fn run<P: AsRef<Path>>(&self, files: &[P]) -> Result<MergeReport> {
        if let Err(e) = self.validate_output() {
            warn!(error = %e, "abandoning merge");
            return Err(e);
        }

        let candidates = self.discover_inputs(files);
        let valid = candidates
            .iter()
            .filter(|(_, t)| *t != InputFileType::Unknown)
            .count();
        if valid == 0 {
            info!("no valid files provided, abandoning merge");
        } else {
            info!(files = valid, "merging files");
        }

        let mut merger = Merger::new();
        let mut inputs = Vec::with_capacity(candidates.len());

        for (path, file_type) in candidates {
            let status = match self.merge_input(&mut merger, &path, file_type) {
                Ok(status) => status,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping file");
                    InputStatus::Skipped {
                        reason: e.to_string(),
                    }
                }
            };
            inputs.push(InputReport {
                path,
                file_type,
                status,
            });
        }

        let merged = merger.into_merged();
        let written = match &merged {
            Some(table) => {
                write_csv(table, &self.config.output_path)?;
                info!(
                    output = %self.config.output_path.display(),
                    rows = table.row_count(),
                    columns = table.column_count(),
                    "merged table written"
                );
                true
            }
            None => {
                info!("merged table is empty, nothing written");
                false
            }
        };

        Ok(MergeReport {
            generated_at: Utc::now(),
            output_path: self.config.output_path.clone(),
            id_column: self.config.id_column.clone(),
            inputs,
            column_count: merged.as_ref().map_or(0, Table::column_count),
            row_count: merged.as_ref().map_or(0, Table::row_count),
            written,
            merged,
        })
    }

    fn merge_input(
        &self,
        merger: &mut Merger,
        path: &Path,
        file_type: InputFileType,
    ) -> Result<InputStatus> {
        let table = self.parse_input(path, file_type)?;
        merger.merge(&table)?;
        Ok(InputStatus::Merged {
            rows: table.row_count(),
            columns: table.column_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, RecordMerger) {
        let dir = tempfile::tempdir().unwrap();
        let config = MergeConfig {
            output_path: dir.path().join("combined.csv"),
            ..MergeConfig::default()
        };
        (dir, RecordMerger::new(config).unwrap())
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_run_merges_csv_and_html() {
        let (dir, merger) = setup();
        let html = write(
            &dir,
            "first.html",
            "<table><tr><th>ID</th><th>Name</th></tr>\
             <tr><td>1</td><td>Homer</td></tr></table>",
        );
        let csv = write(&dir, "second.csv", "ID,Name,City\n1,Bart,\n2,Lisa,Springfield\n");

        let report = merger.run(&[html, csv]).unwrap();

        assert!(report.written);
        assert_eq!(report.merged_count(), 2);
        assert_eq!(report.row_count, 2);
        assert_eq!(report.column_count, 3);
        let output = fs::read_to_string(dir.path().join("combined.csv")).unwrap();
        assert_eq!(output, "ID,Name,City\n1,Homer,\n2,Lisa,Springfield\n");
    }

    #[test]
    fn test_run_skips_bad_inputs() {
        let (dir, merger) = setup();
        let good = write(&dir, "good.csv", "ID,Name\n1,Homer\n");
        let no_id = write(&dir, "no_id.csv", "Key,Name\n1,Bart\n");
        let notes = write(&dir, "notes.txt", "ID,Name\n2,Lisa\n");
        let missing = dir.path().join("missing.csv");

        let report = merger
            .run(&[good.clone(), no_id, notes, missing, good])
            .unwrap();

        assert_eq!(report.inputs.len(), 4);
        assert_eq!(report.merged_count(), 1);
        assert_eq!(report.skipped_count(), 3);
        assert_eq!(report.inputs[2].file_type, InputFileType::Unknown);
        assert_eq!(report.row_count, 1);
        assert!(report.written);
    }

    #[test]
    fn test_run_with_nothing_to_merge() {
        let (dir, merger) = setup();
        let notes = write(&dir, "notes.txt", "ID\n1\n");

        let report = merger.run(&[notes]).unwrap();

        assert!(!report.written);
        assert!(report.merged.is_none());
        assert!(!dir.path().join("combined.csv").exists());
    }

    #[test]
    fn test_rejects_non_csv_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = MergeConfig {
            output_path: dir.path().join("combined.html"),
            ..MergeConfig::default()
        };
        let merger = RecordMerger::new(config).unwrap();
        let input = write(&dir, "a.csv", "ID\n1\n");

        assert!(matches!(
            merger.run(&[input]),
            Err(Error::UnsupportedOutputType(_))
        ));
    }

    #[test]
    fn test_rejects_read_only_output() {
        let (dir, merger) = setup();
        let output = write(&dir, "combined.csv", "old contents\n");
        let mut perms = fs::metadata(&output).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&output, perms).unwrap();
        let input = write(&dir, "a.csv", "ID\n1\n");

        assert!(matches!(
            merger.run(&[input]),
            Err(Error::OutputNotWritable(_))
        ));
        assert_eq!(fs::read_to_string(&output).unwrap(), "old contents\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_output_owned_by_another_user() {
        use std::os::unix::fs::MetadataExt;

        // needs a file this process may not write despite its write bits,
        // which root cannot observe
        let uid = fs::metadata("/proc/self").map(|m| m.uid()).unwrap_or(0);
        let path = Path::new("/etc/passwd");
        let Ok(meta) = fs::metadata(path) else {
            return;
        };
        if uid == 0 || meta.uid() == uid {
            return;
        }

        assert!(!meta.permissions().readonly());
        assert!(matches!(
            ensure_writable(path),
            Err(Error::OutputNotWritable(_))
        ));
    }

    #[test]
    fn test_existing_writable_output_is_kept() {
        let (dir, merger) = setup();
        let output = write(&dir, "combined.csv", "old contents\n");

        merger.validate_output().unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "old contents\n");
    }

    #[test]
    fn test_rejects_directory_output() {
        let (dir, merger) = setup();
        fs::create_dir(dir.path().join("combined.csv")).unwrap();

        assert!(matches!(
            merger.validate_output(),
            Err(Error::OutputNotWritable(_))
        ));
    }

    #[test]
    fn test_rejects_empty_config() {
        let config = MergeConfig {
            output_path: PathBuf::new(),
            ..MergeConfig::default()
        };
        assert!(matches!(
            RecordMerger::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_report_serializes() {
        let (dir, merger) = setup();
        let input = write(&dir, "a.csv", "ID,Name\n1,Homer\n");
        let bad = write(&dir, "b.dat", "");

        let report = merger.run(&[input, bad]).unwrap();
        let report_path = dir.path().join("report.json");
        report.save(&report_path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(json["id_column"], "ID");
        assert_eq!(json["written"], true);
        assert_eq!(json["inputs"][0]["status"], "merged");
        assert_eq!(json["inputs"][0]["rows"], 1);
        assert_eq!(json["inputs"][1]["status"], "skipped");
        assert_eq!(json["inputs"][1]["file_type"], "unknown");
        assert!(json.get("merged").is_none());
    }
}
