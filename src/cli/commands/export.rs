//! Export command implementation
//!
//! Streams registrants from the export API as JSON lines, to stdout or a file.

use crate::cli::exit_code;
use crate::config::{load_config, ClientConfig};
use crate::core::export::{ExportCoordinator, SearchFilter, SearchOptions, SearchSummary};
use crate::domain::RegistrationRecord;
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Event to export (defaults to export.default_event_id)
    #[arg(long)]
    pub event_id: Option<String>,

    /// Look up a single registration by id
    #[arg(long)]
    pub registration_id: Option<String>,

    /// Only export registrants with this email (case-insensitive)
    #[arg(long)]
    pub email: Option<String>,

    /// Page size hint (defaults to export.page_size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Resume from a continuation token
    #[arg(long)]
    pub page_token: Option<String>,

    /// Stop after this many records
    #[arg(long)]
    pub max_records: Option<usize>,

    /// Write records to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config(config_path).and_then(|c| ClientConfig::from_config(&c)) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                tracing::error!(error = %e, "Configuration validation failed");
                eprintln!("Configuration validation failed: {e}");
                return Ok(exit_code(&e));
            }
        };

        let coordinator = match ExportCoordinator::new(config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code(&e));
            }
        };

        let sink: Box<dyn Write + Send> = match &self.output {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(io::stdout()),
        };
        let mut writer = RecordWriter::new(sink, self.max_records);

        let result = coordinator
            .execute_query(self.filter(), self.options(), |record| writer.write(&record))
            .await;

        writer.flush()?;
        if let Some(e) = writer.take_error() {
            tracing::error!(error = %e, "Failed to write registrant");
            eprintln!("Failed to write output: {e}");
            return Ok(5);
        }

        match result {
            Ok(summary) => {
                eprintln!("✅ {}", summary_line(&summary));
                if let Some(path) = &self.output {
                    eprintln!("   Output: {path}");
                }
                Ok(0)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Export failed");
                eprintln!("❌ Export failed: {e}");
                Ok(exit_code(&e))
            }
        }
    }

    fn filter(&self) -> SearchFilter {
        SearchFilter {
            event_id: None,
            registration_id: self.registration_id.clone(),
            email: self.email.clone(),
        }
    }

    fn options(&self) -> SearchOptions {
        SearchOptions {
            event_id: self.event_id.clone(),
            page_size: self.page_size,
            paged_results_cookie: self.page_token.clone(),
        }
    }
}

fn summary_line(summary: &SearchSummary) -> String {
    let mut line = format!(
        "Exported {} registrant(s) from {} page(s)",
        summary.records_delivered, summary.pages_fetched
    );
    if summary.records_filtered > 0 {
        line.push_str(&format!(
            ", {} of {} seen were filtered out",
            summary.records_filtered,
            summary.records_seen()
        ));
    }
    if summary.stopped_by_consumer {
        line.push_str(", stopped at --max-records");
    }
    line
}

/// JSON-lines consumer with an optional record cap
///
/// The first write error is kept and stops the search.
struct RecordWriter<W: Write> {
    out: BufWriter<W>,
    limit: Option<usize>,
    written: usize,
    error: Option<io::Error>,
}

impl<W: Write> RecordWriter<W> {
    fn new(out: W, limit: Option<usize>) -> Self {
        Self {
            out: BufWriter::new(out),
            limit,
            written: 0,
            error: None,
        }
    }

    /// Write one record; `false` means stop
    fn write(&mut self, record: &RegistrationRecord) -> bool {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                self.error = Some(io::Error::new(io::ErrorKind::InvalidData, e));
                return false;
            }
        };
        if let Err(e) = writeln!(self.out, "{line}") {
            self.error = Some(e);
            return false;
        }
        self.written += 1;
        self.limit.map_or(true, |limit| self.written < limit)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}
