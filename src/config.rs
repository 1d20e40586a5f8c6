//! ParamParser configuration
//!
//! Loaded from a TOML file (`paramparser.toml` by convention). Every field has
//! a default, so a partial file or no file at all is fine. Command-line flags
//! override whatever is loaded here.

use crate::error::{ParamParserError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Target database label used when none is configured
pub const DEFAULT_DATABASE_NAME: &str = "ParamParser_Demo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamParserConfig {
    /// Name stored alongside every persisted parameter record
    pub database_name: String,

    /// Globs a file must match to be scanned
    pub include_patterns: Vec<String>,

    /// Globs that exclude a file even when it is included
    pub ignore_patterns: Vec<String>,

    /// Maximum file size to process (in bytes)
    pub max_file_size: u64,

    /// Worker threads (defaults to CPU count)
    pub threads: Option<usize>,

    /// Routines per parallel batch
    pub batch_size: usize,
}

impl Default for ParamParserConfig {
    fn default() -> Self {
        Self {
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            include_patterns: vec!["**/*.sql".to_string()],
            ignore_patterns: vec![
                "**/.git/**".to_string(),
                "**/target/**".to_string(),
                "**/bin/**".to_string(),
                "**/obj/**".to_string(),
            ],
            max_file_size: 1024 * 1024, // 1MB default
            threads: None,
            batch_size: 100,
        }
    }
}

impl ParamParserConfig {
    /// Load configuration, falling back to defaults when the file is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: ParamParserConfig = toml::from_str(&content)?;
        config.validate()?;

        debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Load from an optional path; `None` means defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml_content)?;

        debug!("Saved configuration to: {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_name.trim().is_empty() {
            return Err(ParamParserError::Config(
                "database_name must not be empty".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ParamParserError::Config(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(ParamParserError::Config(
                "threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Thread count to use, resolving the CPU-count default
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}
