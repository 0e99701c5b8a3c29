//! External system integrations.
//!
//! - [`source`] - legacy receipt databases (SQLite, PostgreSQL)
//! - [`scan`] - the scan-processing HTTP service
//!
//! Both sides sit behind traits ([`source::RecordSource`],
//! [`scan::ScanService`]) so the migration driver can be exercised with
//! in-memory implementations.
//!
//! ```rust,no_run
//! use nfce_migrator::adapters::scan::{RetryPolicy, ScanService, SubmissionClient};
//! use nfce_migrator::adapters::source::{create_record_source, RecordSource};
//! use nfce_migrator::config::MigratorConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MigratorConfig::default();
//!
//! let mut source = create_record_source(&config)?;
//! source.connect().await?;
//! println!("{} eligible receipts", source.total_eligible().await?);
//!
//! let client = SubmissionClient::new(
//!     &config.api,
//!     RetryPolicy::from_config(&config.migration),
//!     false,
//! )?;
//! client.health_check().await?;
//! # Ok(())
//! # }
//! ```

pub mod scan;
pub mod source;
