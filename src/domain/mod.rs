//! Domain models and types for the migrator.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Receipt model** ([`ReceiptRecord`]) read from the legacy database
//! - **Submission outcomes** ([`Outcome`], [`FailureKind`])
//! - **Error types** ([`MigratorError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, MigratorError>`]:
//!
//! ```rust
//! use nfce_migrator::domain::{MigratorError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = nfce_migrator::config::MigratorConfig::default();
//!     config
//!         .validate()
//!         .map_err(MigratorError::Configuration)?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod outcome;
pub mod receipt;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::MigratorError;
pub use outcome::{FailureKind, Outcome};
pub use receipt::{ReceiptRecord, ReceiptRecordBuilder, REQUIRED_FIELDS};
pub use result::Result;
