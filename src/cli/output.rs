/// Output formatting for the CLI
///
/// - JSON: one pretty-printed array (single files, small runs)
/// - NDJSON: one record per line, streamed as produced
/// - SQLite: records go to the database layer; the writer itself is a sink
use anyhow::{Result, bail};
use paramparser_scanner::ParameterRecord;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// Standard JSON array (pretty-printed)
    Json,

    /// Newline-delimited JSON (streaming)
    Ndjson,

    /// SQLite database path (bulk mode)
    Sqlite(PathBuf),
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    /// Parses the stdout formats; SQLite output is selected with `--db`
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "ndjson" | "jsonl" => Ok(OutputFormat::Ndjson),
            other => bail!("Unknown output format '{}' (expected json or ndjson)", other),
        }
    }
}

pub struct OutputWriter<W: Write = Box<dyn Write>> {
    format: OutputFormat,
    writer: W,
    buffer: Vec<ParameterRecord>,
}

impl OutputWriter<Box<dyn Write>> {
    /// Writer targeting stdout, or a sink for SQLite mode
    pub fn new(format: OutputFormat) -> Result<Self> {
        let writer: Box<dyn Write> = match &format {
            OutputFormat::Sqlite(_) => Box::new(io::sink()),
            _ => Box::new(io::stdout()),
        };
        Ok(Self::with_writer(format, writer))
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn with_writer(format: OutputFormat, writer: W) -> Self {
        Self {
            format,
            writer,
            buffer: Vec::new(),
        }
    }

    /// Write one record (streamed for NDJSON, buffered for JSON)
    pub fn write_record(&mut self, record: &ParameterRecord) -> Result<()> {
        match &self.format {
            OutputFormat::Ndjson => {
                writeln!(self.writer, "{}", serde_json::to_string(record)?)?;
            }
            OutputFormat::Json => self.buffer.push(record.clone()),
            OutputFormat::Sqlite(_) => {}
        }
        Ok(())
    }

    pub fn write_batch(&mut self, records: &[ParameterRecord]) -> Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Emit buffered records and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        if self.format == OutputFormat::Json {
            writeln!(
                self.writer,
                "{}",
                serde_json::to_string_pretty(&self.buffer)?
            )?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// One-line JSON summary printed after a database write
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    pub database_name: String,
    pub routines: usize,
    pub parameters: usize,
    pub with_defaults: usize,
    pub partial_routines: usize,
    pub duration_ms: u64,
}

impl ScanSummary {
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
