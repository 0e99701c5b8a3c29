//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{MigratorConfig, MySqlConfig, PostgreSQLConfig};
use super::secret::secret_string;
use crate::domain::errors::MigratorError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file, or starts from defaults if it does not exist
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into MigratorConfig
/// 4. Applies environment variable overrides (NFCE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File exists but cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use nfce_migrator::config::loader::load_config;
///
/// let config = load_config("nfce-migrator.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MigratorConfig> {
    let path = path.as_ref();

    let mut config = if path.exists() {
        let contents = fs::read_to_string(path).map_err(|e| {
            MigratorError::Configuration(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        let contents = substitute_env_vars(&contents)?;
        toml::from_str(&contents)
            .map_err(|e| MigratorError::Configuration(format!("Failed to parse TOML: {e}")))?
    } else {
        tracing::debug!(
            path = %path.display(),
            "Configuration file not found, using defaults and environment"
        );
        MigratorConfig::default()
    };

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        MigratorError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied verbatim.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MigratorError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let replaced = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        lines.push(replaced.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(MigratorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        MigratorError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

/// Applies environment variable overrides using NFCE_* prefix
///
/// Environment variables follow the pattern NFCE_<SECTION>_<KEY>,
/// for example NFCE_API_BASE_URL or NFCE_MIGRATION_PAGE_SIZE.
/// Unlike file values, a malformed override is an error rather than ignored.
fn apply_env_overrides(config: &mut MigratorConfig) -> Result<()> {
    let var = |name: &str| std::env::var(name).ok();

    // Application overrides
    if let Some(val) = var("NFCE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = var("NFCE_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_env("NFCE_APPLICATION_DRY_RUN", &val)?;
    }

    // API overrides
    if let Some(val) = var("NFCE_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Some(val) = var("NFCE_API_QR_BASE_URL") {
        config.api.qr_base_url = val;
    }
    if let Some(val) = var("NFCE_API_SUBMIT_TIMEOUT_SECS") {
        config.api.submit_timeout_secs = parse_env("NFCE_API_SUBMIT_TIMEOUT_SECS", &val)?;
    }

    // Source overrides
    if let Some(val) = var("NFCE_SOURCE_KIND") {
        config.source.kind = val.parse().map_err(MigratorError::Configuration)?;
    }
    if let Some(val) = var("NFCE_SOURCE_TABLE") {
        config.source.table = val;
    }
    if let Some(val) = var("NFCE_SOURCE_SQLITE_PATH") {
        config.source.sqlite_path = val;
    }
    if let Some(val) = var("NFCE_SOURCE_MYSQL_CONNECTION_STRING") {
        match config.source.mysql {
            Some(ref mut mysql) => mysql.connection_string = secret_string(val),
            None => {
                config.source.mysql = Some(MySqlConfig {
                    connection_string: secret_string(val),
                    connect_timeout_secs: 10,
                })
            }
        }
    }
    if let Some(val) = var("NFCE_SOURCE_POSTGRESQL_CONNECTION_STRING") {
        match config.source.postgresql {
            Some(ref mut pg) => pg.connection_string = secret_string(val),
            None => {
                config.source.postgresql = Some(PostgreSQLConfig {
                    connection_string: secret_string(val),
                    ssl_mode: "prefer".to_string(),
                    connect_timeout_secs: 10,
                })
            }
        }
    }

    // Migration overrides
    if let Some(val) = var("NFCE_MIGRATION_PAGE_SIZE") {
        config.migration.page_size = parse_env("NFCE_MIGRATION_PAGE_SIZE", &val)?;
    }
    if let Some(val) = var("NFCE_MIGRATION_MAX_RETRIES") {
        config.migration.max_retries = parse_env("NFCE_MIGRATION_MAX_RETRIES", &val)?;
    }
    if let Some(val) = var("NFCE_MIGRATION_RETRY_DELAY_MS") {
        config.migration.retry_delay_ms = parse_env("NFCE_MIGRATION_RETRY_DELAY_MS", &val)?;
    }
    if let Some(val) = var("NFCE_MIGRATION_FAILURE_LOG_PATH") {
        config.migration.failure_log_path = val;
    }

    // Logging overrides
    if let Some(val) = var("NFCE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("NFCE_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = var("NFCE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
