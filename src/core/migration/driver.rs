//! Migration driver - orchestrates one migration run
//!
//! The driver validates both ends, pages through the legacy table, turns
//! each receipt into a lookup URL, submits it and commits the outcome into a
//! [`RunReport`]. Receipts are handled strictly one at a time.

use super::batch::PageWindow;
use super::report::{RunReport, RunState};
use crate::adapters::scan::ScanService;
use crate::adapters::source::RecordSource;
use crate::config::MigratorConfig;
use crate::core::request::build_request;
use crate::domain::{FailureKind, MigratorError, Outcome, ReceiptRecord, Result};
use crate::log_receipt_outcome;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::watch;

/// Window and mode for a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Maximum receipts to process; `None` means all
    pub limit: Option<u64>,

    /// Eligible receipts to skip before the first page
    pub offset: u64,

    /// Recorded in the report; the scan service decides whether to simulate
    pub dry_run: bool,
}

/// Settings the driver takes from configuration
#[derive(Debug, Clone)]
pub struct DriverSettings {
    pub qr_base_url: String,
    pub page_size: usize,
    /// Where to write failures at the end of a run, if anywhere
    pub failure_log_path: Option<PathBuf>,
    /// Failures listed in the rendered summary
    pub failure_preview: usize,
}

impl DriverSettings {
    pub fn from_config(config: &MigratorConfig) -> Self {
        Self {
            qr_base_url: config.api.qr_base_url.clone(),
            page_size: config.migration.page_size,
            failure_log_path: Some(PathBuf::from(&config.migration.failure_log_path)),
            failure_preview: config.migration.failure_preview,
        }
    }
}

/// Batch migration driver
pub struct MigrationDriver {
    source: Box<dyn RecordSource>,
    scan: Box<dyn ScanService>,
    settings: DriverSettings,
    shutdown_signal: watch::Receiver<bool>,
    state: RunState,
}

impl MigrationDriver {
    /// Create a new driver
    ///
    /// # Arguments
    ///
    /// * `source` - Legacy receipt source, not yet connected
    /// * `scan` - Service receiving the lookup URLs
    /// * `settings` - Page size, base URL and failure log settings
    /// * `shutdown_signal` - Set to `true` to stop before the next receipt
    pub fn new(
        source: Box<dyn RecordSource>,
        scan: Box<dyn ScanService>,
        settings: DriverSettings,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            scan,
            settings,
            shutdown_signal,
            state: RunState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute a run to a terminal state
    ///
    /// Never fails: validation and paging errors end the run as
    /// [`RunState::Aborted`] with the reason recorded in the report. The
    /// source is always disconnected and failures are persisted before the
    /// report is returned.
    pub async fn run(&mut self, options: RunOptions) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport::new(options.dry_run);

        tracing::info!(
            run_id = %report.run_id,
            source = %self.source.describe(),
            limit = ?options.limit,
            offset = options.offset,
            dry_run = options.dry_run,
            "Starting migration"
        );

        self.transition(&mut report, RunState::Validating);
        match self.validate(&mut report).await {
            Ok(()) => {
                self.transition(&mut report, RunState::Running);
                match self.process(&mut report, &options).await {
                    Ok(state) => self.transition(&mut report, state),
                    Err(e) => {
                        tracing::error!(error = %e, "Reading receipts failed, aborting run");
                        report.abort(e.to_string());
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Validation failed, nothing was processed");
                report.abort(e.to_string());
            }
        }
        self.state = report.state;

        self.finalize(report, started).await
    }

    fn transition(&mut self, report: &mut RunReport, next: RunState) {
        tracing::debug!(from = %self.state, to = %next, "Run state change");
        self.state = next;
        report.state = next;
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown_signal.borrow()
    }

    async fn validate(&mut self, report: &mut RunReport) -> Result<()> {
        self.source.connect().await?;
        report.total = self.source.total_eligible().await?;
        tracing::info!(total = report.total, "Eligible receipts found");

        self.scan.health_check().await?;
        tracing::info!("Scan service is reachable");

        // Informational; a missing status document never aborts
        match self.scan.api_status().await {
            Ok(document) => tracing::debug!(status = %document, "Scan service status"),
            Err(e) => tracing::warn!(error = %e, "Could not read scan service status"),
        }

        report.validated = true;
        Ok(())
    }

    async fn process(&self, report: &mut RunReport, options: &RunOptions) -> Result<RunState> {
        let mut window = PageWindow::new(self.settings.page_size, options.offset, options.limit);

        loop {
            if self.shutdown_requested() {
                tracing::warn!("Shutdown requested, stopping before next page");
                return Ok(RunState::Interrupted);
            }

            let Some((size, offset)) = window.next_page() else {
                tracing::info!(fetched = window.fetched(), "Limit reached");
                break;
            };

            let page = self.source.page(size, offset).await?;
            if page.is_empty() {
                break;
            }
            window.advance(page.len());
            tracing::debug!(offset = offset, rows = page.len(), "Fetched page");

            for record in &page {
                if self.shutdown_requested() {
                    tracing::warn!(
                        processed = report.processed,
                        "Shutdown requested, stopping before next receipt"
                    );
                    return Ok(RunState::Interrupted);
                }
                self.process_record(record, report).await;
            }

            if page.len() < size {
                break;
            }
        }

        Ok(RunState::Completed)
    }

    async fn process_record(&self, record: &ReceiptRecord, report: &mut RunReport) {
        let outcome = match build_request(&self.settings.qr_base_url, record) {
            Ok(url) => self.scan.submit(&url).await,
            Err(e) => Outcome::Failure {
                kind: FailureKind::MissingField,
                reason: missing_field_reason(e),
            },
        };

        report.record(record.id, &outcome);
        log_receipt_outcome!(
            record.id,
            outcome.label(),
            report.progress_pct(),
            outcome_detail(&outcome)
        );
    }

    async fn finalize(&mut self, report: RunReport, started: Instant) -> RunReport {
        debug_assert!(report.state.is_terminal(), "finalize called mid-run");

        if let Err(e) = self.source.disconnect().await {
            tracing::warn!(error = %e, "Failed to close record source");
        }

        let mut report = report.with_duration(started.elapsed());

        if let Some(path) = &self.settings.failure_log_path {
            match report.persist_failures(path) {
                Ok(written) => report.failure_log = written,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to write failure log")
                }
            }
        }

        report.log_summary();
        report
    }
}

fn missing_field_reason(err: MigratorError) -> String {
    match err {
        MigratorError::MissingField { field, .. } => format!("missing required field '{field}'"),
        other => other.to_string(),
    }
}

fn outcome_detail(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success { message, .. } | Outcome::Duplicate { message } => {
            message.clone().unwrap_or_default()
        }
        Outcome::Failure { reason, .. } | Outcome::TransientError(reason) => reason.clone(),
    }
}
