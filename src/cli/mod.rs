/// Shared pieces of the `paramparser` binary
///
/// Modules:
/// - commands: the scan / file / catalog / init flows
/// - output: JSON / NDJSON / SQLite output
/// - parallel: batched scanning on a Rayon pool
/// - progress: stderr progress reporting
pub mod commands;
pub mod output;
pub mod parallel;
pub mod progress;

pub use commands::{run_catalog, run_file, run_init, run_scan};
pub use output::{OutputFormat, OutputWriter, ScanSummary};
pub use parallel::{ParallelScanner, ScanConfig, ScanReport};
pub use progress::{ProgressEvent, ProgressReporter};
