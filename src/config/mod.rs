//! Configuration management for the migrator.
//!
//! Configuration comes from three layers, later ones winning:
//!
//! 1. Built-in defaults (local SQLite file, local scan service)
//! 2. An optional TOML file with `${VAR_NAME}` substitution
//! 3. `NFCE_<SECTION>_<KEY>` environment variables (a `.env` file is loaded
//!    by the binary before parsing)
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_url = "https://teste.neurelix.com.br"
//!
//! [source]
//! kind = "postgresql"
//!
//! [source.postgresql]
//! connection_string = "${NFCE_LEGACY_DATABASE_URL}"
//!
//! [migration]
//! page_size = 10
//! max_retries = 3
//! retry_delay_ms = 2000
//! ```
//!
//! ```rust,no_run
//! use nfce_migrator::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("nfce-migrator.toml")?;
//! println!("Scan endpoint: {}", config.api.scan_url());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApiConfig, ApplicationConfig, LoggingConfig, MigrationConfig, MigratorConfig, MySqlConfig,
    PostgreSQLConfig, SourceConfig, SourceKind,
};
pub use secret::{redact_connection_string, secret_string, SecretString, SecretValue};
