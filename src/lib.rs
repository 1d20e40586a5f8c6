// ParamParser - T-SQL routine parameter extraction
//!
//! Discovers stored procedures and functions (from script directories or a
//! SQLite catalog), extracts their declared parameters and default values with
//! `paramparser-scanner`, and writes the records as JSON or into SQLite.

pub mod cli;
pub mod config;
pub mod database;
pub mod discovery;
pub mod error;


// Re-export common types
pub use config::ParamParserConfig;
pub use database::ParamDatabase;
pub use discovery::{CatalogSource, DirectorySource, Routine, RoutineKind, RoutineSource};
pub use error::{ParamParserError, Result};
pub use paramparser_scanner::{ObjectId, ParameterRecord, extract_parameters};
