// NFC-e Migrator - legacy receipt migration tool
// Copyright (c) 2025 NFC-e Migrator Contributors
// Licensed under the MIT License

//! # NFC-e Migrator
//!
//! Migrates fiscal receipts (NFC-e) from a legacy relational database into
//! the scan-processing service. Each receipt's QR-code lookup URL is rebuilt
//! from five stored fields and submitted as if the receipt had just been
//! scanned; the service's own duplicate detection makes reruns safe.
//!
//! ## Overview
//!
//! - **Reading** eligible receipts page by page, newest first
//! - **Rebuilding** each receipt's lookup URL
//! - **Submitting** it with bounded retry and exponential backoff
//! - **Reporting** success, duplicate and failure counts, with a failure log
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Request building, migration driver and run report
//! - [`adapters`] - Legacy database sources and the scan service client
//! - [`domain`] - Receipt model, outcomes and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nfce_migrator::adapters::scan::{RetryPolicy, SubmissionClient};
//! use nfce_migrator::adapters::source::create_record_source;
//! use nfce_migrator::config::load_config;
//! use nfce_migrator::core::migration::{DriverSettings, MigrationDriver, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("nfce-migrator.toml")?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let client = SubmissionClient::new(
//!         &config.api,
//!         RetryPolicy::from_config(&config.migration),
//!         config.application.dry_run,
//!     )?;
//!     let mut driver = MigrationDriver::new(
//!         create_record_source(&config)?,
//!         Box::new(client),
//!         DriverSettings::from_config(&config),
//!         shutdown_rx,
//!     );
//!
//!     let report = driver.run(RunOptions::default()).await;
//!     println!("Migrated {} of {} receipts", report.succeeded, report.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible library calls return [`domain::Result`], backed by
//! [`domain::MigratorError`]. Per-receipt problems never surface as errors:
//! they become failure entries in the run report.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
