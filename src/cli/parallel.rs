/// Parallel scanning engine for bulk runs
///
/// Routines are split into batches and scanned on a dedicated Rayon pool.
/// Output order always matches input order, whatever the thread count.
use crate::cli::progress::ProgressReporter;
use crate::discovery::{Routine, routines_from_script};
use anyhow::{Context, Result, anyhow};
use paramparser_scanner::{ParameterRecord, extract_parameters};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Configuration for parallel scanning
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Number of worker threads (defaults to CPU count)
    pub num_threads: usize,

    /// Routines per parallel batch
    pub batch_size: usize,

    /// Print progress lines to stderr
    pub show_progress: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            batch_size: 100,
            show_progress: true,
        }
    }
}

/// Records of a scan run plus how many routines lexed only partially
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub routines: usize,
    pub records: Vec<ParameterRecord>,
    pub partial_routines: usize,
}

pub struct ParallelScanner {
    config: ScanConfig,
}

impl ParallelScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn scan_routines(&self, routines: &[Routine]) -> Result<Vec<ParameterRecord>> {
        Ok(self.scan_report(routines)?.records)
    }

    pub fn scan_report(&self, routines: &[Routine]) -> Result<ScanReport> {
        if routines.is_empty() {
            return Ok(ScanReport::default());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads.max(1))
            .build()
            .map_err(|e| anyhow!("Failed to build thread pool: {}", e))?;

        let total = routines.len();
        let reporter = Mutex::new(if self.config.show_progress {
            ProgressReporter::new(total)
        } else {
            ProgressReporter::silent(total)
        });
        let processed = Mutex::new(0usize);

        let batches: Vec<(Vec<ParameterRecord>, usize)> = pool.install(|| {
            routines
                .par_chunks(self.config.batch_size.max(1))
                .map(|batch| {
                    let mut records = Vec::new();
                    let mut partial = 0;
                    for routine in batch {
                        let (found, was_partial) = scan_routine(routine);
                        records.extend(found);
                        partial += usize::from(was_partial);
                    }

                    if let Ok(mut count) = processed.lock() {
                        *count += batch.len();
                        if let Ok(mut reporter) = reporter.lock() {
                            reporter.report(*count);
                        }
                    }

                    (records, partial)
                })
                .collect()
        });

        let mut report = ScanReport {
            routines: total,
            ..ScanReport::default()
        };
        for (records, partial) in batches {
            report.records.extend(records);
            report.partial_routines += partial;
        }

        let reporter = reporter
            .into_inner()
            .map_err(|e| anyhow!("Progress lock poisoned: {}", e))?;
        reporter.complete(report.records.len());

        Ok(report)
    }

    /// Scan every routine defined in one script file
    pub fn scan_file(&self, file_path: &Path) -> Result<Vec<ParameterRecord>> {
        let script = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;
        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string_lossy().to_string());

        let routines = routines_from_script(&name, &script);
        debug!("{}: {} routine(s)", name, routines.len());
        self.scan_routines(&routines)
    }
}

/// Records for one routine and whether its token stream was cut short
fn scan_routine(routine: &Routine) -> (Vec<ParameterRecord>, bool) {
    let extraction = extract_parameters(routine.object_id, &routine.definition);

    for diagnostic in &extraction.diagnostics {
        warn!(
            "{} ({}): tokenizer stopped at {}:{}: {}",
            routine.name,
            routine.object_id,
            diagnostic.line,
            diagnostic.column,
            diagnostic.message
        );
    }

    let partial = !extraction.diagnostics.is_empty();
    (extraction.records, partial)
}
