//! Core migration logic.
//!
//! # Modules
//!
//! - [`request`] - lookup URL derivation from a receipt's five fields
//! - [`migration`] - the batch driver, page window and run report
//!
//! # Migration Workflow
//!
//! 1. **Validate**: connect to the source, count eligible receipts, check the
//!    scan service is healthy
//! 2. **Page**: read receipts newest first in `page_size` windows
//! 3. **Build**: derive each receipt's lookup URL
//! 4. **Submit**: send it with bounded retry and backoff
//! 5. **Report**: count the outcome, then summarize and persist failures
//!
//! # Example
//!
//! ```rust,no_run
//! use nfce_migrator::adapters::scan::{RetryPolicy, SubmissionClient};
//! use nfce_migrator::adapters::source::create_record_source;
//! use nfce_migrator::config::load_config;
//! use nfce_migrator::core::migration::{DriverSettings, MigrationDriver, RunOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("nfce-migrator.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let source = create_record_source(&config)?;
//! let client = SubmissionClient::new(
//!     &config.api,
//!     RetryPolicy::from_config(&config.migration),
//!     false,
//! )?;
//!
//! let mut driver = MigrationDriver::new(
//!     source,
//!     Box::new(client),
//!     DriverSettings::from_config(&config),
//!     shutdown_rx,
//! );
//! let report = driver.run(RunOptions { limit: Some(100), ..Default::default() }).await;
//!
//! println!("{}", report.render_summary(config.migration.failure_preview));
//! # Ok(())
//! # }
//! ```

pub mod migration;
pub mod request;
