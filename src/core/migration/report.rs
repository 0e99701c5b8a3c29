//! Run reporting
//!
//! [`RunReport`] accumulates per-receipt outcomes while the driver runs and
//! renders the end-of-run summary and failure log.

use crate::domain::{FailureKind, Outcome, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

const RULE_WIDTH: usize = 60;
const FAILURE_LOG_RULE_WIDTH: usize = 50;

/// Lifecycle of a migration run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Validating,
    Running,
    Completed,
    Interrupted,
    Aborted,
}

impl RunState {
    /// Whether the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::Interrupted | RunState::Aborted
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Validating => "validating",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Interrupted => "interrupted",
            RunState::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// One failed receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureEntry {
    pub record_id: i64,
    pub kind: FailureKind,
    pub reason: String,
}

impl fmt::Display for FailureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Receipt {}: {}", self.record_id, self.reason)
    }
}

/// Counters and failures for one migration run
///
/// `processed == succeeded + duplicated + failed` holds after every call to
/// [`RunReport::record`]. Failures are kept in processing order.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Unique id of this run
    pub run_id: Uuid,

    /// Eligible receipts in the source when the run was validated
    pub total: u64,

    pub processed: u64,
    pub succeeded: u64,
    pub duplicated: u64,
    pub failed: u64,

    /// Failed receipts in processing order
    pub failures: Vec<FailureEntry>,

    pub started_at: DateTime<Utc>,
    pub duration: Duration,

    /// Whether submissions were simulated
    pub dry_run: bool,

    pub state: RunState,

    /// Whether both ends passed validation
    pub validated: bool,

    /// Why the run was aborted, when it was
    pub abort_reason: Option<String>,

    /// Where failures were written, when they were
    pub failure_log: Option<PathBuf>,
}

impl RunReport {
    /// Create an empty report for a new run
    pub fn new(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            total: 0,
            processed: 0,
            succeeded: 0,
            duplicated: 0,
            failed: 0,
            failures: Vec::new(),
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
            dry_run,
            state: RunState::Idle,
            validated: false,
            abort_reason: None,
            failure_log: None,
        }
    }

    /// Commit the terminal outcome of one receipt
    ///
    /// A stray [`Outcome::TransientError`] is counted as exhausted retries.
    pub fn record(&mut self, record_id: i64, outcome: &Outcome) {
        match outcome {
            Outcome::Success { .. } => {
                self.processed += 1;
                self.succeeded += 1;
            }
            Outcome::Duplicate { .. } => {
                self.processed += 1;
                self.duplicated += 1;
            }
            Outcome::Failure { kind, reason } => {
                self.record_failure(record_id, *kind, reason.clone());
            }
            Outcome::TransientError(reason) => {
                self.record_failure(record_id, FailureKind::RetriesExhausted, reason.clone());
            }
        }
    }

    /// Commit a failed receipt
    pub fn record_failure(&mut self, record_id: i64, kind: FailureKind, reason: String) {
        self.processed += 1;
        self.failed += 1;
        self.failures.push(FailureEntry {
            record_id,
            kind,
            reason,
        });
    }

    /// Mark the run as aborted
    pub fn abort(&mut self, reason: impl Into<String>) {
        self.state = RunState::Aborted;
        self.abort_reason = Some(reason.into());
    }

    /// Set the elapsed time
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Completed with no failed receipts
    pub fn is_successful(&self) -> bool {
        self.state == RunState::Completed && self.failed == 0
    }

    /// Share of processed receipts accepted as new, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.processed == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.processed as f64) * 100.0
    }

    /// Progress through the eligible set, as a percentage
    pub fn progress_pct(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.processed as f64 / self.total as f64 * 100.0).min(100.0)
    }

    /// Render the human-readable end-of-run summary
    ///
    /// At most `preview` failures are listed; the rest are counted.
    pub fn render_summary(&self, preview: usize) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("MIGRATION SUMMARY (run {})", self.run_id));
        if self.dry_run {
            out.push_str(" [DRY RUN]");
        }
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');

        out.push_str(&format!("State:        {}\n", self.state));
        out.push_str(&format!("Eligible:     {}\n", self.total));
        out.push_str(&format!("Processed:    {}\n", self.processed));
        out.push_str(&format!("Succeeded:    {}\n", self.succeeded));
        out.push_str(&format!("Duplicated:   {}\n", self.duplicated));
        out.push_str(&format!("Failed:       {}\n", self.failed));
        if self.processed > 0 {
            out.push_str(&format!("Success rate: {:.1}%\n", self.success_rate()));
        }
        out.push_str(&format!("Duration:     {:.1}s\n", self.duration.as_secs_f64()));

        if let Some(reason) = &self.abort_reason {
            out.push_str(&format!("Aborted:      {reason}\n"));
        }

        if !self.failures.is_empty() {
            out.push_str("\nFirst failures:\n");
            for failure in self.failures.iter().take(preview) {
                out.push_str(&format!("  - {failure}\n"));
            }
            if self.failures.len() > preview {
                out.push_str(&format!(
                    "  ... and {} more failures\n",
                    self.failures.len() - preview
                ));
            }
        }

        if let Some(path) = &self.failure_log {
            out.push_str(&format!("\nFailures written to {}\n", path.display()));
        }

        out.push_str(&rule);
        out
    }

    /// Log the summary as structured events
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            state = %self.state,
            total = self.total,
            processed = self.processed,
            succeeded = self.succeeded,
            duplicated = self.duplicated,
            failed = self.failed,
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Migration finished"
        );

        if let Some(reason) = &self.abort_reason {
            tracing::error!(run_id = %self.run_id, reason = %reason, "Migration aborted");
        }

        if !self.failures.is_empty() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Migration completed with failures"
            );
        }
    }

    /// Append this run's failures to the failure log
    ///
    /// Each run adds its own headed section, so earlier runs stay readable.
    /// Returns the path written, or `None` when there was nothing to write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn persist_failures(&self, path: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        if self.failures.is_empty() {
            return Ok(None);
        }

        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut contents = format!(
            "Migration failures - {} (run {})\n",
            Utc::now().to_rfc3339(),
            self.run_id
        );
        contents.push_str(&"=".repeat(FAILURE_LOG_RULE_WIDTH));
        contents.push_str("\n\n");
        for failure in &self.failures {
            contents.push_str(&failure.to_string());
            contents.push('\n');
        }
        contents.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(contents.as_bytes())?;
        Ok(Some(path.to_path_buf()))
    }
}
