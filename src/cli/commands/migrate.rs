//! Migrate command implementation
//!
//! This module implements the `migrate` command, which runs the batch
//! driver against the configured source and scan service.

use crate::adapters::scan::{RetryPolicy, SubmissionClient};
use crate::adapters::source::create_record_source;
use crate::config::{load_config, MigratorConfig};
use crate::core::migration::{DriverSettings, MigrationDriver, RunOptions, RunReport, RunState};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Maximum number of receipts to process
    #[arg(long)]
    pub limit: Option<u64>,

    /// Number of eligible receipts to skip before starting
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Dry run mode - walk receipts without submitting them
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl MigrateArgs {
    /// Execute the migrate command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting migrate command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let dry_run = self.dry_run || config.application.dry_run;
        if dry_run {
            tracing::info!("Dry run mode enabled - receipts will not be submitted");
            println!("🔍 DRY RUN MODE - receipts will not be submitted");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !dry_run {
            println!("Migration Configuration:");
            println!("  Source: {} ({})", config.source.kind, config.source.table);
            println!("  Scan endpoint: {}", config.api.scan_url());
            println!(
                "  Limit: {}",
                self.limit
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "All".to_string())
            );
            println!("  Offset: {}", self.offset);
            println!("  Page size: {}", config.migration.page_size);
            println!();
            print!("Proceed with migration? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Migration cancelled.");
                return Ok(0);
            }
        }

        let options = RunOptions {
            limit: self.limit,
            offset: self.offset,
            dry_run,
        };
        run_migration(&config, options, shutdown_signal).await
    }
}

/// Build the driver from configuration, run it and print the summary
pub(crate) async fn run_migration(
    config: &MigratorConfig,
    options: RunOptions,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<i32> {
    let source = match create_record_source(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create record source");
            eprintln!("{e}");
            return Ok(2); // Configuration error exit code
        }
    };

    let client = SubmissionClient::new(
        &config.api,
        RetryPolicy::from_config(&config.migration),
        options.dry_run,
    )?;

    let mut driver = MigrationDriver::new(
        source,
        Box::new(client),
        DriverSettings::from_config(config),
        shutdown_signal,
    );

    println!("🚀 Starting migration...");
    println!();

    let report = driver.run(options).await;

    println!();
    println!("{}", report.render_summary(config.migration.failure_preview));

    Ok(exit_code(&report))
}

/// Map a finished run to the process exit code
pub fn exit_code(report: &RunReport) -> i32 {
    match report.state {
        RunState::Completed if report.is_successful() => 0,
        RunState::Completed => 1,
        RunState::Interrupted => 130,
        RunState::Aborted if !report.validated => 3,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FailureKind, Outcome};

    #[test]
    fn test_exit_code_completed() {
        let mut report = RunReport::new(false);
        report.state = RunState::Completed;
        report.record(1, &Outcome::Success { simulated: false, message: None });
        assert_eq!(exit_code(&report), 0);

        report.record_failure(2, FailureKind::RemoteRejection, "no".to_string());
        assert_eq!(exit_code(&report), 1);
    }

    #[test]
    fn test_exit_code_interrupted() {
        let mut report = RunReport::new(false);
        report.state = RunState::Interrupted;
        assert_eq!(exit_code(&report), 130);
    }

    #[test]
    fn test_exit_code_aborted() {
        let mut report = RunReport::new(false);
        report.abort("scan service unreachable");
        assert_eq!(exit_code(&report), 3);

        report.validated = true;
        assert_eq!(exit_code(&report), 5);
    }
}
