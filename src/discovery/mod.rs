//! Routine discovery
//!
//! A [`RoutineSource`] yields the procedures and functions to scan. Two sources
//! exist: a directory of `.sql` scripts split on `GO` batches, and a SQLite
//! catalog holding module definitions per target database.

mod batches;

pub use batches::{routine_header, routine_name, split_batches};

use crate::config::ParamParserConfig;
use crate::database::ParamDatabase;
use crate::error::{ParamParserError, Result};
use anyhow::Context;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use paramparser_scanner::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Procedure or function, stored in the catalog as `P` / `FN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineKind {
    Procedure,
    Function,
}

impl RoutineKind {
    pub fn as_code(&self) -> &'static str {
        match self {
            RoutineKind::Procedure => "P",
            RoutineKind::Function => "FN",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "P" => Some(RoutineKind::Procedure),
            "FN" => Some(RoutineKind::Function),
            _ => None,
        }
    }
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutineKind::Procedure => write!(f, "procedure"),
            RoutineKind::Function => write!(f, "function"),
        }
    }
}

/// A stored procedure or function with its full definition text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub object_id: ObjectId,
    pub name: String,
    pub kind: RoutineKind,
    pub definition: String,
}

pub trait RoutineSource {
    /// All routines this source provides, in a stable order
    fn routines(&self) -> anyhow::Result<Vec<Routine>>;
}

/// Stable object id for the `batch_index`-th batch of a script.
///
/// First four bytes of `md5("relative_path#batch_index")`, little-endian,
/// masked to a positive 31-bit integer.
pub fn object_id_for(relative_path: &str, batch_index: usize) -> ObjectId {
    let digest = md5::compute(format!("{}#{}", relative_path, batch_index));
    let raw = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
    ObjectId(i64::from(raw & 0x7fff_ffff))
}

/// Routines defined in one script, one per `GO` batch with a routine header.
///
/// Batches without a `CREATE PROCEDURE/FUNCTION` header (grants, table DDL)
/// are skipped but still count toward the batch index.
pub fn routines_from_script(relative_path: &str, script: &str) -> Vec<Routine> {
    split_batches(script)
        .into_iter()
        .enumerate()
        .filter_map(|(index, batch)| {
            let (kind, name) = routine_header(batch)?;
            Some(Routine {
                object_id: object_id_for(relative_path, index),
                name,
                kind,
                definition: batch.trim().to_string(),
            })
        })
        .collect()
}

/// Scans `.sql` scripts below a root directory
pub struct DirectorySource {
    root: PathBuf,
    include: GlobSet,
    ignore: GlobSet,
    max_file_size: u64,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, config: &ParamParserConfig) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ParamParserError::SourceNotFound(root));
        }

        Ok(Self {
            root,
            include: build_glob_set(&config.include_patterns)?,
            ignore: build_glob_set(&config.ignore_patterns)?,
            max_file_size: config.max_file_size,
        })
    }

    /// Matching script files as (absolute path, forward-slash relative path),
    /// sorted by relative path
    pub fn discover_files(&self) -> Vec<(PathBuf, String)> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };
            let relative = relative.to_string_lossy().replace('\\', "/");

            if !self.include.is_match(&relative) || self.ignore.is_match(&relative) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.len() > self.max_file_size => {
                    debug!(
                        "Skipping {} ({} bytes exceeds max_file_size)",
                        relative,
                        meta.len()
                    );
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Cannot stat {}: {}", relative, e);
                    continue;
                }
            }

            files.push((path.to_path_buf(), relative));
        }

        files.sort_by(|a, b| a.1.cmp(&b.1));
        files
    }

    /// Routines in a single file, named relative to the source root
    pub fn routines_in_file(&self, path: &Path, relative_path: &str) -> anyhow::Result<Vec<Routine>> {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(routines_from_script(relative_path, &script))
    }
}

impl RoutineSource for DirectorySource {
    fn routines(&self) -> anyhow::Result<Vec<Routine>> {
        let mut routines = Vec::new();

        for (path, relative) in self.discover_files() {
            match self.routines_in_file(&path, &relative) {
                Ok(found) => {
                    debug!("{}: {} routine(s)", relative, found.len());
                    routines.extend(found);
                }
                Err(e) => warn!("Skipping {}: {:#}", relative, e),
            }
        }

        Ok(routines)
    }
}

/// Modules of one target database stored in a SQLite catalog
pub struct CatalogSource {
    db_path: PathBuf,
    database_name: String,
}

impl CatalogSource {
    pub fn new(db_path: impl Into<PathBuf>, database_name: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            database_name: database_name.into(),
        }
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

impl RoutineSource for CatalogSource {
    fn routines(&self) -> anyhow::Result<Vec<Routine>> {
        let db = ParamDatabase::open_existing(&self.db_path)?;
        db.get_modules_with_params(&self.database_name)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|source| ParamParserError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ParamParserError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}
