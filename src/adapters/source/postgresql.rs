//! PostgreSQL record source
//!
//! Holds a single `tokio_postgres::Client` for the lifetime of a run. The
//! connection future is driven by a spawned task that is aborted on
//! disconnect.

use super::{eligibility_predicate, quote_identifier, RecordSource, SELECT_COLUMNS};
use crate::config::{redact_connection_string, PostgreSQLConfig};
use crate::domain::{MigratorError, ReceiptRecord, Result};
use async_trait::async_trait;
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_postgres::config::SslMode;
use tokio_postgres::{Client, NoTls, Row};

/// Legacy receipts stored in PostgreSQL
pub struct PostgreSQLSource {
    config: PostgreSQLConfig,
    table: String,
    client: Option<Client>,
    connection_task: Option<JoinHandle<()>>,
}

impl PostgreSQLSource {
    /// Create a source for `table` using the given connection settings
    ///
    /// Nothing is opened until [`RecordSource::connect`] is called.
    pub fn new(config: PostgreSQLConfig, table: impl Into<String>) -> Self {
        Self {
            config,
            table: table.into(),
            client: None,
            connection_task: None,
        }
    }

    fn client(&self) -> Result<&Client> {
        self.client.as_ref().ok_or_else(|| {
            MigratorError::Connection("PostgreSQL source used before connect()".to_string())
        })
    }

    fn page_sql(&self) -> String {
        // Cast everything to text so integer-typed legacy columns read uniformly
        let columns = SELECT_COLUMNS
            .iter()
            .map(|c| {
                if *c == "id" {
                    "\"id\"::bigint".to_string()
                } else {
                    format!("\"{c}\"::text")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "SELECT {columns} FROM {} WHERE {} ORDER BY \"createdAt\" DESC, \"id\" DESC LIMIT $1 OFFSET $2",
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

    fn ssl_mode(&self) -> SslMode {
        match self.config.ssl_mode.as_str() {
            "disable" => SslMode::Disable,
            "require" => SslMode::Require,
            _ => SslMode::Prefer,
        }
    }
}

fn map_row(row: &Row) -> std::result::Result<ReceiptRecord, tokio_postgres::Error> {
    Ok(ReceiptRecord {
        id: row.try_get(0)?,
        access_key: row.try_get(1)?,
        document_version: row.try_get(2)?,
        environment_code: row.try_get(3)?,
        issuer_token_id: row.try_get(4)?,
        signature_digest: row.try_get(5)?,
        issuer_name: row.try_get(6)?,
        issuer_tax_id: row.try_get(7)?,
        issuer_state_registration: row.try_get(8)?,
        created_at: row.try_get(9)?,
    })
}

#[async_trait]
impl RecordSource for PostgreSQLSource {
    async fn connect(&mut self) -> Result<()> {
        if self.client.is_some() {
            return Ok(());
        }

        let mut pg_config: tokio_postgres::Config = self
            .config
            .connection_string
            .expose_secret()
            .as_ref()
            .parse()
            .map_err(|e| {
                MigratorError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;
        pg_config
            .ssl_mode(self.ssl_mode())
            .connect_timeout(Duration::from_secs(self.config.connect_timeout_secs));

        let (client, task) = if self.ssl_mode() == SslMode::Disable {
            let (client, connection) = pg_config.connect(NoTls).await.map_err(|e| {
                MigratorError::Connection(format!("Failed to connect to PostgreSQL: {e}"))
            })?;
            let task = tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::error!(error = %e, "PostgreSQL connection error");
                }
            });
            (client, task)
        } else {
            let connector = native_tls::TlsConnector::builder().build().map_err(|e| {
                MigratorError::Connection(format!("Failed to build TLS connector: {e}"))
            })?;
            let (client, connection) = pg_config
                .connect(MakeTlsConnector::new(connector))
                .await
                .map_err(|e| {
                    MigratorError::Connection(format!("Failed to connect to PostgreSQL: {e}"))
                })?;
            let task = tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::error!(error = %e, "PostgreSQL connection error");
                }
            });
            (client, task)
        };

        let table_exists = client
            .query_one("SELECT to_regclass($1::text) IS NOT NULL", &[&quote_identifier(&self.table)])
            .await
            .map_err(|e| MigratorError::Connection(format!("PostgreSQL schema check failed: {e}")))?
            .try_get::<_, bool>(0)
            .map_err(|e| MigratorError::Source(e.to_string()))?;

        if !table_exists {
            task.abort();
            return Err(MigratorError::Source(format!(
                "Table '{}' not found",
                self.table
            )));
        }

        tracing::info!(source = %self.describe(), "Connected to PostgreSQL source");
        self.client = Some(client);
        self.connection_task = Some(task);
        Ok(())
    }

    async fn total_eligible(&self) -> Result<u64> {
        let row = self
            .client()?
            .query_one(self.count_sql().as_str(), &[])
            .await
            .map_err(|e| MigratorError::Source(format!("Failed to count receipts: {e}")))?;
        let count: i64 = row
            .try_get(0)
            .map_err(|e| MigratorError::Source(format!("Unexpected count result: {e}")))?;
        Ok(count.max(0) as u64)
    }

    async fn page(&self, limit: usize, offset: u64) -> Result<Vec<ReceiptRecord>> {
        let limit = limit as i64;
        let offset = offset as i64;
        let rows = self
            .client()?
            .query(self.page_sql().as_str(), &[&limit, &offset])
            .await
            .map_err(|e| MigratorError::Source(format!("Failed to query receipts: {e}")))?;

        rows.iter()
            .map(map_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| MigratorError::Source(format!("Failed to read receipt row: {e}")))
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.client = None;
        if let Some(task) = self.connection_task.take() {
            task.abort();
            tracing::debug!("PostgreSQL source closed");
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "postgresql:{} (table {})",
            redact_connection_string(&self.config.connection_string),
            self.table
        )
    }
}
