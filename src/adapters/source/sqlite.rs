//! SQLite record source
//!
//! rusqlite is synchronous, so every query runs on the blocking pool via
//! `tokio::task::spawn_blocking` with the connection behind a mutex.

use super::{eligibility_predicate, quote_identifier, RecordSource, SELECT_COLUMNS};
use crate::domain::{MigratorError, ReceiptRecord, Result};
use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Legacy receipts stored in a SQLite file
pub struct SqliteSource {
    path: PathBuf,
    table: String,
    conn: Option<Arc<Mutex<Connection>>>,
}

impl SqliteSource {
    /// Create a source for `table` in the database file at `path`
    ///
    /// Nothing is opened until [`RecordSource::connect`] is called.
    pub fn new(path: impl AsRef<Path>, table: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            table: table.into(),
            conn: None,
        }
    }

    fn connection(&self) -> Result<Arc<Mutex<Connection>>> {
        self.conn.clone().ok_or_else(|| {
            MigratorError::Connection("SQLite source used before connect()".to_string())
        })
    }

    fn page_sql(&self) -> String {
        let columns = SELECT_COLUMNS
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "SELECT {columns} FROM {} WHERE {} ORDER BY \"createdAt\" DESC, \"id\" DESC LIMIT ?1 OFFSET ?2",
            quote_identifier(&self.table),
            eligibility_predicate()
        )
    }

    fn count_sql(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            quote_identifier(&self.table),
            eligibility_predicate()
        )
    }
}

/// Reads a column as text whatever its storage class
///
/// Legacy rows hold `versao` and `ambiente` as integers in some exports.
fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    })
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<ReceiptRecord> {
    Ok(ReceiptRecord {
        id: row.get(0)?,
        access_key: text_column(row, 1)?,
        document_version: text_column(row, 2)?,
        environment_code: text_column(row, 3)?,
        issuer_token_id: text_column(row, 4)?,
        signature_digest: text_column(row, 5)?,
        issuer_name: text_column(row, 6)?,
        issuer_tax_id: text_column(row, 7)?,
        issuer_state_registration: text_column(row, 8)?,
        created_at: text_column(row, 9)?,
    })
}

fn lock_error<T>(_: T) -> MigratorError {
    MigratorError::Source("SQLite connection mutex poisoned".to_string())
}

fn join_error(e: tokio::task::JoinError) -> MigratorError {
    MigratorError::Source(format!("SQLite task failed: {e}"))
}

#[async_trait]
impl RecordSource for SqliteSource {
    async fn connect(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        let path = self.path.clone();
        let table = self.table.clone();

        let conn = tokio::task::spawn_blocking(move || -> Result<Connection> {
            let conn = Connection::open_with_flags(
                &path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|e| {
                MigratorError::Connection(format!(
                    "Failed to open SQLite database {}: {}",
                    path.display(),
                    e
                ))
            })?;

            let exists: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    params![table],
                    |row| row.get(0),
                )
                .map_err(|e| {
                    MigratorError::Connection(format!(
                        "Failed to read SQLite schema from {}: {}",
                        path.display(),
                        e
                    ))
                })?;

            if exists == 0 {
                return Err(MigratorError::Source(format!(
                    "Table '{}' not found in {}",
                    table,
                    path.display()
                )));
            }

            Ok(conn)
        })
        .await
        .map_err(join_error)??;

        tracing::info!(path = %self.path.display(), table = %self.table, "Connected to SQLite source");
        self.conn = Some(Arc::new(Mutex::new(conn)));
        Ok(())
    }

    async fn total_eligible(&self) -> Result<u64> {
        let conn = self.connection()?;
        let sql = self.count_sql();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(lock_error)?;
            let count: i64 = conn
                .query_row(&sql, [], |row| row.get(0))
                .map_err(|e| MigratorError::Source(format!("Failed to count receipts: {e}")))?;
            Ok(count.max(0) as u64)
        })
        .await
        .map_err(join_error)?
    }

    async fn page(&self, limit: usize, offset: u64) -> Result<Vec<ReceiptRecord>> {
        let conn = self.connection()?;
        let sql = self.page_sql();
        let limit = limit as i64;
        let offset = offset as i64;

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(lock_error)?;
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| MigratorError::Source(format!("Failed to prepare page query: {e}")))?;

            let rows = stmt
                .query_map(params![limit, offset], map_row)
                .map_err(|e| MigratorError::Source(format!("Failed to query receipts: {e}")))?;

            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| MigratorError::Source(format!("Failed to read receipt row: {e}")))
        })
        .await
        .map_err(join_error)?
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.conn.take().is_some() {
            tracing::debug!(path = %self.path.display(), "SQLite source closed");
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{} (table {})", self.path.display(), self.table)
    }
}
