//! ParamParser's Database Module - SQLite catalog and parameter store
//!
//! `modules` stands in for a server's module catalog; `module_params` receives
//! the extracted parameter records per target database.

use crate::error::ParamParserError;
use anyhow::{Result, anyhow};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

mod bulk_operations;
mod modules;
mod schema;
pub mod types;

pub use types::*;

/// The main database connection and operations
pub struct ParamDatabase {
    pub(crate) conn: Connection,
    pub(crate) file_path: PathBuf,
}

impl ParamDatabase {
    /// Create a new database connection and initialize schema
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::open_with_flags(db_path.as_ref(), OpenFlags::default())
    }

    /// Open a database that must already exist; never creates the file
    pub fn open_existing<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        if !path.is_file() {
            return Err(ParamParserError::SourceNotFound(path.to_path_buf()).into());
        }

        Self::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    fn open_with_flags(path: &Path, flags: OpenFlags) -> Result<Self> {
        let file_path = path.to_path_buf();

        info!("Opening SQLite database at: {}", file_path.display());

        let conn = Connection::open_with_flags(&file_path, flags)
            .map_err(|e| anyhow!("Failed to open database {}: {}", file_path.display(), e))?;

        // Wait up to 5 seconds for locks held by another writer
        conn.busy_timeout(std::time::Duration::from_millis(5000))?;

        // journal_mode returns the resulting mode as a row
        let journal: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        debug!("Journal mode: {}", journal);

        let mut db = Self { conn, file_path };
        db.initialize_schema()?;

        info!("Database ready");
        Ok(db)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Merge the WAL into the main file and truncate it.
    ///
    /// Returns (busy, log, checkpointed) frame counts.
    pub fn checkpoint_wal(&mut self) -> Result<(i32, i32, i32)> {
        let result = self
            .conn
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?;

        debug!(
            "WAL checkpoint complete: busy={}, log={}, checkpointed={}",
            result.0, result.1, result.2
        );
        Ok(result)
    }
}
