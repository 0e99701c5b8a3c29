//! Record source factory
//!
//! Builds the [`RecordSource`] implementation selected by `source.kind`.

use super::{MySqlSource, PostgreSQLSource, RecordSource, SqliteSource};
use crate::config::{MigratorConfig, SourceKind};
use crate::domain::{MigratorError, Result};

/// Create a record source based on the configuration
///
/// The returned source is not yet connected.
///
/// # Errors
///
/// Returns a configuration error if the selected server engine has no
/// matching `[source.mysql]` or `[source.postgresql]` section.
pub fn create_record_source(config: &MigratorConfig) -> Result<Box<dyn RecordSource>> {
    let source = &config.source;

    match source.kind {
        SourceKind::Sqlite => {
            tracing::debug!(path = %source.sqlite_path, "Creating SQLite record source");
            Ok(Box::new(SqliteSource::new(&source.sqlite_path, &source.table)))
        }
        SourceKind::MySql => {
            let mysql_config = source.mysql.clone().ok_or_else(|| {
                MigratorError::Configuration(
                    "source.kind is 'mysql' but [source.mysql] is missing".to_string(),
                )
            })?;

            tracing::debug!("Creating MySQL record source");
            Ok(Box::new(MySqlSource::new(mysql_config, &source.table)))
        }
        SourceKind::PostgreSQL => {
            let pg_config = source.postgresql.clone().ok_or_else(|| {
                MigratorError::Configuration(
                    "source.kind is 'postgresql' but [source.postgresql] is missing".to_string(),
                )
            })?;

            tracing::debug!("Creating PostgreSQL record source");
            Ok(Box::new(PostgreSQLSource::new(pg_config, &source.table)))
        }
    }
}
