//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the migrator configuration.

use crate::config::{load_config, redact_connection_string, SourceKind};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Scan Endpoint: {}", config.api.scan_url());
        println!("  Status Endpoint: {}", config.api.status_url());
        println!("  QR Base URL: {}", config.api.qr_base_url);

        match config.source.kind {
            SourceKind::Sqlite => {
                println!("  Source: SQLite ({})", config.source.sqlite_path);
            }
            SourceKind::MySql => {
                if let Some(ref mysql_config) = config.source.mysql {
                    println!(
                        "  Source: MySQL ({})",
                        redact_connection_string(&mysql_config.connection_string)
                    );
                }
            }
            SourceKind::PostgreSQL => {
                if let Some(ref pg_config) = config.source.postgresql {
                    println!(
                        "  Source: PostgreSQL ({})",
                        redact_connection_string(&pg_config.connection_string)
                    );
                    println!("  SSL Mode: {}", pg_config.ssl_mode);
                }
            }
        }

        println!("  Table: {}", config.source.table);
        println!("  Page Size: {}", config.migration.page_size);
        println!("  Max Retries: {}", config.migration.max_retries);
        println!("  Retry Delay: {}ms", config.migration.retry_delay_ms);
        println!("  Failure Log: {}", config.migration.failure_log_path);
        println!();
        Ok(0)
    }
}
