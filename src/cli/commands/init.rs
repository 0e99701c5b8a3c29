//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "nfce-migrator.toml")]
    pub output: String,

    /// Include every option with explanatory comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing NFC-e Migrator configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point [source] at the legacy database");
                println!("  3. For PostgreSQL, set NFCE_LEGACY_DATABASE_URL in .env");
                println!("  4. Check connectivity: nfce-migrator test-connection");
                println!("  5. Try a few receipts: nfce-migrator dry-run");
                println!("  6. Run the migration: nfce-migrator migrate");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# NFC-e Migrator Configuration File

[application]
log_level = "info"
dry_run = false

[api]
base_url = "http://localhost:1425"
qr_base_url = "https://www.sefaz.mt.gov.br/nfce/consultanfce"

[source]
kind = "sqlite"  # sqlite | mysql | postgresql
table = "notas_fiscais"
sqlite_path = "database_old.sqlite"

# [source.mysql]
# connection_string = "${NFCE_LEGACY_DATABASE_URL}"

# [source.postgresql]
# connection_string = "${NFCE_LEGACY_DATABASE_URL}"
# ssl_mode = "prefer"

[migration]
page_size = 10
max_retries = 3
retry_delay_ms = 2000
failure_log_path = "migration_errors.log"

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# NFC-e Migrator Configuration File
#
# Replays legacy NFC-e receipts into the scan-processing service by
# rebuilding each receipt's QR-code URL and submitting it.
#
# Every key can be overridden with NFCE_<SECTION>_<KEY>, for example
# NFCE_API_BASE_URL or NFCE_MIGRATION_PAGE_SIZE. Values may reference
# environment variables as ${VAR_NAME}.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (walk receipts without submitting them)
dry_run = false

# ============================================================================
# Scan Service
# ============================================================================
[api]
# Base URL of the scan-processing service
base_url = "http://localhost:1425"

# Endpoint receiving {"qrCode": "..."} submissions
scan_path = "/api/scan/process"

# Health and status endpoint
status_path = "/api/status"

# Base of the lookup URL printed in the receipts' QR codes
qr_base_url = "https://www.sefaz.mt.gov.br/nfce/consultanfce"

# Per-attempt timeouts in seconds
submit_timeout_secs = 30
health_timeout_secs = 10

# User-Agent sent with every request
user_agent = "NFC-e-Migration/1.0"

# ============================================================================
# Legacy Database
# ============================================================================
[source]
# Backing engine: sqlite | mysql | postgresql
kind = "sqlite"

# Table holding the legacy receipts
table = "notas_fiscais"

# SQLite database file (kind = "sqlite")
sqlite_path = "database_old.sqlite"

# Uncomment this section if using MySQL or MariaDB (kind = "mysql")
#
# [source.mysql]
# # Connection string format: mysql://[user[:password]@]host[:port]/dbname
# connection_string = "${NFCE_LEGACY_DATABASE_URL}"
#
# # Connect timeout in seconds
# connect_timeout_secs = 10

# Uncomment this section if using PostgreSQL (kind = "postgresql")
#
# [source.postgresql]
# # Connection string format: postgresql://[user[:password]@][host][:port][/dbname]
# connection_string = "${NFCE_LEGACY_DATABASE_URL}"
#
# # SSL/TLS mode: disable | prefer | require
# ssl_mode = "prefer"
#
# # Connect timeout in seconds
# connect_timeout_secs = 10

# ============================================================================
# Migration
# ============================================================================
[migration]
# Receipts read per page (1-1000)
page_size = 10

# Retries after a transient failure (0-10); attempts = max_retries + 1
max_retries = 3

# Base backoff in milliseconds, doubled after every failed attempt
retry_delay_ms = 2000

# File receiving one line per failed receipt at the end of a run
failure_log_path = "migration_errors.log"

# Failures listed in the end-of-run summary
failure_preview = 10

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = true

# Directory for log files
local_path = "logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
