//! Run configuration with environment overrides

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;

/// Environment variable overriding the output file
pub const OUTPUT_FILE_ENV: &str = "TABMERGE_OUTPUT_FILE";
/// Environment variable overriding the id column name
pub const ID_COLUMN_ENV: &str = "TABMERGE_ID_COLUMN";

pub const DEFAULT_OUTPUT_FILE: &str = "combined.csv";
pub const DEFAULT_ID_COLUMN: &str = "ID";

/// Settings for a merge run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeConfig {
    /// Where the merged CSV is written
    pub output_path: PathBuf,
    /// Identifier column shared by all inputs
    pub id_column: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            id_column: DEFAULT_ID_COLUMN.to_string(),
        }
    }
}

impl MergeConfig {
    /// Build a config from the process environment, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(output) = lookup(OUTPUT_FILE_ENV) {
            config.output_path = PathBuf::from(output);
        }
        if let Some(id_column) = lookup(ID_COLUMN_ENV) {
            config.id_column = id_column;
        }
        config
    }

    /// Check that both settings are present
    pub fn validate(&self) -> Result<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "output file name must be provided".to_string(),
            ));
        }
        if self.id_column.is_empty() {
            return Err(Error::InvalidConfig(
                "id column name must be provided".to_string(),
            ));
        }
        Ok(())
    }
}
