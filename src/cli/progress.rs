/// Progress reporting for long-running scans
///
/// Updates go to stderr so stdout stays clean for piped JSON/NDJSON output.
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started { total_routines: usize },
    Progress { processed: usize, total: usize },
    Completed { total_params: usize, duration_ms: u64 },
}

pub struct ProgressReporter {
    start_time: Instant,
    total_routines: usize,
    last_report: Option<Instant>,
    quiet: bool,
}

impl ProgressReporter {
    pub fn new(total_routines: usize) -> Self {
        Self::with_output(total_routines, false)
    }

    /// A reporter that tracks events without printing them
    pub fn silent(total_routines: usize) -> Self {
        Self::with_output(total_routines, true)
    }

    fn with_output(total_routines: usize, quiet: bool) -> Self {
        let reporter = Self {
            start_time: Instant::now(),
            total_routines,
            last_report: None,
            quiet,
        };
        reporter.emit(&ProgressEvent::Started { total_routines });
        reporter
    }

    /// Report progress, throttled to one line per 100ms except for the final count
    pub fn report(&mut self, processed: usize) -> Option<ProgressEvent> {
        let now = Instant::now();
        let finished = processed >= self.total_routines;
        if let Some(last) = self.last_report {
            if now.duration_since(last).as_millis() < 100 && !finished {
                return None;
            }
        }
        self.last_report = Some(now);

        let event = ProgressEvent::Progress {
            processed,
            total: self.total_routines,
        };
        self.emit(&event);
        Some(event)
    }

    pub fn complete(&self, total_params: usize) -> ProgressEvent {
        let event = ProgressEvent::Completed {
            total_params,
            duration_ms: self.start_time.elapsed().as_millis() as u64,
        };
        self.emit(&event);
        event
    }

    fn emit(&self, event: &ProgressEvent) {
        if self.quiet {
            return;
        }

        match event {
            ProgressEvent::Started { total_routines } => {
                eprintln!("🚀 Starting scan: {} routines", total_routines);
            }
            ProgressEvent::Progress { processed, total } => {
                let elapsed = self.start_time.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    *processed as f64 / elapsed
                } else {
                    0.0
                };
                let pct = if *total > 0 {
                    (*processed as f64 / *total as f64 * 100.0) as u32
                } else {
                    100
                };
                eprintln!(
                    "⚡ Progress: {}/{} ({}%) - {:.0} routines/sec",
                    processed, total, pct, rate
                );
            }
            ProgressEvent::Completed {
                total_params,
                duration_ms,
            } => {
                eprintln!(
                    "✅ Scan complete: {} parameters from {} routines in {}ms",
                    total_params, self.total_routines, duration_ms
                );
            }
        }
    }
}
