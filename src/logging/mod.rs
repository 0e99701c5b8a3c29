//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - compact console output
//! - JSON file output with rotation
//! - helper macros for the events the migration emits repeatedly
//!
//! # Example
//!
//! ```no_run
//! use nfce_migrator::logging::init_logging;
//! use nfce_migrator::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard, LOG_FILE_NAME};

/// Log the classified outcome of one receipt with run progress
///
/// # Example
///
/// ```no_run
/// use nfce_migrator::log_receipt_outcome;
///
/// log_receipt_outcome!(42_i64, "success", 12.5_f64, "Processed");
/// ```
#[macro_export]
macro_rules! log_receipt_outcome {
    ($record_id:expr, $outcome:expr, $progress_pct:expr, $detail:expr) => {
        tracing::info!(
            record_id = $record_id,
            outcome = $outcome,
            progress = %format!("{:5.1}%", $progress_pct),
            detail = %$detail,
            "Receipt processed"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use nfce_migrator::log_retry_attempt;
///
/// log_retry_attempt!(2, 4, 4000_u64, "HTTP 500: boom");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Transient submission error, backing off"
        );
    };
}
