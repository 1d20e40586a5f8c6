/// Command flows behind the `paramparser` subcommands
///
/// Each flow writes its stdout content to the given writer, so the binary
/// passes stdout and tests pass a buffer.
use crate::cli::output::{OutputFormat, OutputWriter, ScanSummary};
use crate::cli::parallel::{ParallelScanner, ScanConfig, ScanReport};
use crate::config::ParamParserConfig;
use crate::database::ParamDatabase;
use crate::discovery::{CatalogSource, DirectorySource, RoutineSource};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::info;

fn scanner_for(config: &ParamParserConfig, show_progress: bool) -> ParallelScanner {
    ParallelScanner::new(ScanConfig {
        num_threads: config.effective_threads(),
        batch_size: config.batch_size,
        show_progress,
    })
}

fn summarize(database_name: &str, report: &ScanReport, start: Instant) -> ScanSummary {
    ScanSummary {
        database_name: database_name.to_string(),
        routines: report.routines,
        parameters: report.records.len(),
        with_defaults: report.records.iter().filter(|r| r.has_default()).count(),
        partial_routines: report.partial_routines,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

fn write_records(
    format: OutputFormat,
    records: &[paramparser_scanner::ParameterRecord],
    out: &mut dyn Write,
) -> Result<()> {
    let mut writer = OutputWriter::with_writer(format, out);
    writer.write_batch(records)?;
    writer.finish()?;
    Ok(())
}

/// `scan`: records to `out`, or routines and records into `db` plus a summary line
pub fn run_scan(
    dir: &Path,
    db: Option<&Path>,
    format: OutputFormat,
    config: &ParamParserConfig,
    show_progress: bool,
    out: &mut dyn Write,
) -> Result<ScanReport> {
    let start = Instant::now();
    info!("Scanning directory: {:?}", dir);

    let source = DirectorySource::new(dir, config)?;
    let routines = source.routines()?;
    if show_progress {
        eprintln!("📁 Found {} routines", routines.len());
    }

    let report = scanner_for(config, show_progress).scan_report(&routines)?;

    match db {
        Some(db_path) => {
            let mut database = ParamDatabase::new(db_path)
                .with_context(|| format!("Failed to open database: {:?}", db_path))?;
            database.store_modules(&config.database_name, &routines)?;
            database.bulk_store_params(&config.database_name, &report.records)?;
            database.checkpoint_wal()?;

            let summary = summarize(&config.database_name, &report, start);
            writeln!(out, "{}", summary.to_json_line()?)?;
        }
        None => write_records(format, &report.records, out)?,
    }

    Ok(report)
}

/// `file`: every routine of one script
pub fn run_file(file: &Path, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let scanner = ParallelScanner::new(ScanConfig {
        show_progress: false,
        ..ScanConfig::default()
    });

    let records = scanner.scan_file(file)?;
    write_records(format, &records, out)
}

/// `catalog`: scan the catalog's modules and save their parameters back into it
pub fn run_catalog(
    db: &Path,
    config: &ParamParserConfig,
    show_progress: bool,
    out: &mut dyn Write,
) -> Result<Option<ScanReport>> {
    let start = Instant::now();

    let source = CatalogSource::new(db, config.database_name.clone());
    let routines = source
        .routines()
        .with_context(|| format!("Failed to read catalog {:?}", db))?;

    if routines.is_empty() {
        writeln!(out, "No relevant modules found in {}.", source.database_name())?;
        return Ok(None);
    }

    let report = scanner_for(config, show_progress).scan_report(&routines)?;

    let mut database = ParamDatabase::open_existing(db)
        .with_context(|| format!("Failed to open database: {:?}", db))?;
    database.bulk_store_params(source.database_name(), &report.records)?;
    database.checkpoint_wal()?;

    let summary = summarize(source.database_name(), &report, start);
    writeln!(out, "{}", summary.to_json_line()?)?;
    writeln!(out, "Success.")?;
    Ok(Some(report))
}

/// `init`: write the default configuration
pub fn run_init(path: &Path) -> Result<()> {
    ParamParserConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
