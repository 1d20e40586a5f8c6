//! ParamParser scanner library
//!
//! Extracts the declared input parameters of T-SQL stored procedures and
//! functions, together with their default literal values, from routine source
//! text.
//!
//! # Usage
//!
//! ```rust
//! use paramparser_scanner::{ObjectId, extract_parameters};
//!
//! let sql = "CREATE PROCEDURE dbo.p @a INT = 5, @b VARCHAR(10) AS SELECT 1";
//! let extraction = extract_parameters(ObjectId(42), sql);
//! assert_eq!(extraction.records[0].default_value, "5");
//! assert_eq!(extraction.records[1].default_value, "");
//! ```
//!
//! # Pipeline
//!
//! **lexer**: source text -> [`Token`] stream (MsSqlDialect tokenizer)
//! **classifier**: [`TokenKind`] -> [`TokenRole`]
//! **scanner**: role-driven state machine -> [`ParameterRecord`]s

pub mod classifier;
pub mod extraction;
pub mod lexer;
pub mod scanner;
pub mod token;

pub use classifier::{TokenRole, classify, classify_token, is_assignment};
pub use extraction::{Extraction, extract_parameters};
pub use lexer::{LexDiagnostic, LexOutput, lex};
pub use scanner::{
    ObjectId, ParameterRecord, ScanOutcome, ScanState, StopReason, scan, scan_with_outcome,
};
pub use token::{Token, TokenKind};

// Tests module (only compiled during testing)
#[cfg(test)]
pub mod tests;
