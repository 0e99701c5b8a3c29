//! Domain error types
//!
//! This module defines the error hierarchy for the migrator.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main migrator error type
///
/// Per-record problems (a missing field, a remote rejection) end up as
/// failure entries in the run report; the remaining variants abort the
/// operation that produced them.
#[derive(Debug, Error)]
pub enum MigratorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required receipt field is absent or blank
    #[error("Receipt {record_id} is missing required field '{field}'")]
    MissingField {
        /// Legacy row id
        record_id: i64,
        /// Name of the offending field
        field: &'static str,
    },

    /// Source store or remote endpoint unreachable
    #[error("Connection error: {0}")]
    Connection(String),

    /// Source store reachable but the query failed or returned malformed rows
    #[error("Source error: {0}")]
    Source(String),

    /// Remote service errors outside of per-record submission
    #[error("Remote service error: {0}")]
    Remote(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for MigratorError {
    fn from(err: std::io::Error) -> Self {
        MigratorError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MigratorError {
    fn from(err: serde_json::Error) -> Self {
        MigratorError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MigratorError {
    fn from(err: toml::de::Error) -> Self {
        MigratorError::Configuration(format!("TOML parse error: {err}"))
    }
}
