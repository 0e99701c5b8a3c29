//! Test-connection command implementation
//!
//! This module implements the `test-connection` command, which checks both
//! ends of a migration without processing any receipt.

use crate::adapters::scan::{RetryPolicy, ScanService, SubmissionClient};
use crate::adapters::source::{create_record_source, RecordSource};
use crate::config::{load_config, MigratorConfig};
use crate::domain::Result;
use clap::Args;

/// Arguments for the test-connection command
#[derive(Args, Debug)]
pub struct TestConnectionArgs {}

impl TestConnectionArgs {
    /// Execute the test-connection command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Testing connections");

        println!("🔌 Testing connections");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let mut healthy = true;

        match count_source_receipts(&config).await {
            Ok((description, total)) => {
                println!("✅ Legacy database: {description}");
                println!("   Eligible receipts: {total}");
            }
            Err(e) => {
                healthy = false;
                println!("❌ Legacy database unreachable");
                println!("   Error: {e}");
            }
        }

        let client = SubmissionClient::new(&config.api, RetryPolicy::from_config(&config.migration), false)?;
        match client.health_check().await {
            Ok(()) => println!("✅ Scan service: {}", config.api.status_url()),
            Err(e) => {
                healthy = false;
                println!("❌ Scan service unreachable: {}", config.api.status_url());
                println!("   Error: {e}");
            }
        }

        println!();
        if healthy {
            println!("All connections are working.");
            Ok(0)
        } else {
            Ok(3) // Connectivity check failed exit code
        }
    }
}

/// Connect to the configured source, count eligible receipts and disconnect
pub(crate) async fn count_source_receipts(config: &MigratorConfig) -> Result<(String, u64)> {
    let mut source = create_record_source(config)?;
    let description = source.describe();

    source.connect().await?;
    let total = source.total_eligible().await;
    source.disconnect().await?;

    Ok((description, total?))
}
