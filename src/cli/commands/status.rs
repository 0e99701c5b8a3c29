//! Status command implementation
//!
//! This module implements the `status` command: how many receipts are
//! eligible in the legacy database and what the scan service reports about
//! itself.

use super::test_connection::count_source_receipts;
use crate::adapters::scan::{RetryPolicy, ScanService, SubmissionClient};
use crate::config::load_config;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking migration status");

        println!("📊 Migration Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let mut reachable = true;

        match count_source_receipts(&config).await {
            Ok((description, total)) => {
                println!("Legacy database: {description}");
                println!("  Eligible receipts: {total}");
            }
            Err(e) => {
                reachable = false;
                println!("❌ Failed to read legacy database");
                println!("   Error: {e}");
            }
        }
        println!();

        let client = SubmissionClient::new(&config.api, RetryPolicy::from_config(&config.migration), false)?;
        match client.api_status().await {
            Ok(document) => {
                println!("Scan service: {}", config.api.status_url());
                println!("{}", serde_json::to_string_pretty(&document)?);
            }
            Err(e) => {
                reachable = false;
                println!("❌ Failed to fetch scan service status");
                println!("   Error: {e}");
            }
        }
        println!();

        if reachable {
            Ok(0)
        } else {
            Ok(3) // Connectivity check failed exit code
        }
    }
}
