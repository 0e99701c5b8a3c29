//! Dry-run command implementation
//!
//! Shortcut for `migrate --dry-run --yes` with a small default limit, for
//! checking that receipts read and convert correctly.

use super::migrate::run_migration;
use crate::config::load_config;
use crate::core::migration::RunOptions;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the dry-run command
#[derive(Args, Debug)]
pub struct DryRunArgs {
    /// Number of receipts to walk
    #[arg(long, default_value_t = 5)]
    pub limit: u64,

    /// Number of eligible receipts to skip before starting
    #[arg(long, default_value_t = 0)]
    pub offset: u64,
}

impl DryRunArgs {
    /// Execute the dry-run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(limit = self.limit, offset = self.offset, "Starting dry run");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("🔍 DRY RUN - walking {} receipt(s), nothing will be submitted", self.limit);
        println!();

        let options = RunOptions {
            limit: Some(self.limit),
            offset: self.offset,
            dry_run: true,
        };
        run_migration(&config, options, shutdown_signal).await
    }
}
