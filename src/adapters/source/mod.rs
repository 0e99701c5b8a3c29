//! Legacy receipt sources
//!
//! A [`RecordSource`] gives paginated, read-only access to the legacy
//! `notas_fiscais` table. One implementation exists per backing engine:
//!
//! - [`sqlite`] - local SQLite file via `rusqlite`
//! - [`mysql`] - MySQL or MariaDB server via `mysql_async`
//! - [`postgresql`] - PostgreSQL server via `tokio-postgres`
//!
//! All of them share the eligibility columns and ordering defined here so
//! that a run behaves the same regardless of engine.

pub mod factory;
pub mod mysql;
pub mod postgresql;
pub mod sqlite;

pub use factory::create_record_source;
pub use mysql::MySqlSource;
pub use postgresql::PostgreSQLSource;
pub use sqlite::SqliteSource;

use crate::domain::{ReceiptRecord, Result};
use async_trait::async_trait;

/// Legacy column names, in the order every page query selects them
pub(crate) const SELECT_COLUMNS: [&str; 10] = [
    "id",
    "chave",
    "versao",
    "ambiente",
    "cIdToken",
    "vSig",
    "nomeEmitente",
    "cnpjEmitente",
    "ieEmitente",
    "createdAt",
];

/// Columns that must all be non-null for a row to be migratable
pub(crate) const ELIGIBILITY_COLUMNS: [&str; 5] = ["chave", "versao", "ambiente", "cIdToken", "vSig"];

/// Read access to legacy receipts
///
/// Implementations must return pages ordered by creation time, newest first,
/// with ties broken by descending id so that consecutive offsets never skip
/// or repeat a row while the table is unchanged.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Open the underlying connection
    ///
    /// # Errors
    ///
    /// Returns [`MigratorError::Connection`](crate::domain::MigratorError::Connection)
    /// if the store is unreachable or cannot be opened.
    async fn connect(&mut self) -> Result<()>;

    /// Count rows whose five lookup fields are all present
    ///
    /// # Errors
    ///
    /// Returns an error if the source is not connected or the query fails.
    async fn total_eligible(&self) -> Result<u64>;

    /// Fetch up to `limit` eligible rows starting at `offset`
    ///
    /// # Errors
    ///
    /// Returns an error if the source is not connected or the query fails.
    async fn page(&self, limit: usize, offset: u64) -> Result<Vec<ReceiptRecord>>;

    /// Release the underlying connection
    ///
    /// Safe to call when not connected.
    async fn disconnect(&mut self) -> Result<()>;

    /// Human-readable description for logs, with credentials redacted
    fn describe(&self) -> String;
}

/// WHERE clause shared by the count and page queries
pub(crate) fn eligibility_predicate() -> String {
    ELIGIBILITY_COLUMNS
        .iter()
        .map(|c| format!("\"{c}\" IS NOT NULL"))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Quotes a validated table name for interpolation
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
