/// paramparser: extract T-SQL routine parameters and their default values
///
/// Commands:
/// - scan: discover routines under a directory and scan them in parallel
/// - file: scan the routines of one script file
/// - catalog: scan the modules stored in a SQLite catalog and save the results
/// - init: write a default configuration file
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use paramparser::ParamParserConfig;
use paramparser::cli::{OutputFormat, run_catalog, run_file, run_init, run_scan};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "paramparser")]
#[command(about = "Extract parameters and default values from T-SQL procedures and functions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by the commands that run a parallel scan
#[derive(clap::Args, Debug, Clone)]
struct RunArgs {
    /// Target database label stored with each record
    #[arg(short = 'n', long)]
    database_name: Option<String>,

    /// Number of parallel threads (defaults to CPU count)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Routines per parallel batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Optional log file path for info-level logging
    #[arg(short, long)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan every routine found in a directory of .sql scripts
    Scan {
        /// Directory to scan recursively
        #[arg(short, long)]
        dir: PathBuf,

        /// Write routines and parameters to this SQLite database instead of stdout
        #[arg(short = 'b', long)]
        db: Option<PathBuf>,

        /// Output format for stdout: json or ndjson
        #[arg(short, long, default_value = "ndjson")]
        format: String,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Scan the routines defined in one script file
    File {
        /// Script to scan
        #[arg(short, long)]
        file: PathBuf,

        /// Output format: json or ndjson
        #[arg(long, default_value = "json")]
        format: String,

        /// Optional log file path for info-level logging
        #[arg(short, long)]
        log: Option<PathBuf>,
    },

    /// Scan the modules stored in a SQLite catalog and save their parameters
    Catalog {
        /// SQLite catalog database
        #[arg(short = 'b', long)]
        db: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Write the default configuration
    Init {
        /// Destination path
        #[arg(short, long, default_value = "paramparser.toml")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = match &cli.command {
        Commands::Scan { run, .. } | Commands::Catalog { run, .. } => run.log.clone(),
        Commands::File { log, .. } => log.clone(),
        Commands::Init { .. } => None,
    };

    init_logging(log_path.as_ref())?;

    match cli.command {
        Commands::Scan {
            dir,
            db,
            format,
            run,
        } => scan_directory(dir, db, &format, run),
        Commands::File {
            file,
            format,
            log: _,
        } => scan_single_file(file, &format),
        Commands::Catalog { db, run } => scan_catalog(db, run),
        Commands::Init { config } => init_config(&config),
    }
}

/// Initialize logging with optional file output
fn init_logging(log_path: Option<&PathBuf>) -> Result<()> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    if let Some(log_file) = log_path {
        // With log file: info+ to file, warn+ to stderr
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let file_appender = tracing_appender::rolling::never(
            log_file.parent().unwrap_or_else(|| Path::new(".")),
            log_file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("paramparser.log"),
        );

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(file_appender.and(std::io::stderr.with_max_level(tracing::Level::WARN)))
            .init();

        eprintln!("📝 Logging to: {:?}", log_file);
    } else {
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

/// Load the configuration and apply command-line overrides
fn resolve_config(run: &RunArgs) -> Result<ParamParserConfig> {
    let mut config = ParamParserConfig::load_or_default(run.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(name) = &run.database_name {
        config.database_name = name.clone();
    }
    if let Some(threads) = run.threads {
        config.threads = Some(threads);
    }
    if let Some(batch_size) = run.batch_size {
        config.batch_size = batch_size;
    }

    config.validate()?;
    Ok(config)
}

fn scan_directory(dir: PathBuf, db: Option<PathBuf>, format: &str, run: RunArgs) -> Result<()> {
    let config = resolve_config(&run)?;
    let format: OutputFormat = format.parse()?;
    let mut stdout = std::io::stdout().lock();
    run_scan(&dir, db.as_deref(), format, &config, true, &mut stdout)?;
    Ok(())
}

fn scan_single_file(file: PathBuf, format: &str) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let mut stdout = std::io::stdout().lock();
    run_file(&file, format, &mut stdout)
}

fn scan_catalog(db: PathBuf, run: RunArgs) -> Result<()> {
    let config = resolve_config(&run)?;
    let mut stdout = std::io::stdout().lock();
    run_catalog(&db, &config, true, &mut stdout)?;
    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    run_init(path)?;
    eprintln!("✅ Wrote default configuration to {:?}", path);
    Ok(())
}
