//! HTTP client for the scan-processing service

use super::models::{ScanRequest, ScanResponse};
use super::ScanService;
use crate::config::{ApiConfig, MigrationConfig};
use crate::domain::{FailureKind, MigratorError, Outcome, Result};
use crate::log_retry_attempt;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;

/// Bounded retry with exponential backoff
///
/// A submission gets `max_retries + 1` attempts. After failed attempt `k`
/// (0-based), and only if another attempt follows, the client sleeps
/// `base_delay * 2^k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Build from the `[migration]` section
    pub fn from_config(config: &MigrationConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    /// Total attempts per submission
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Backoff after failed attempt `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(2000))
    }
}

/// Client for the scan endpoint
///
/// Every submission ends in a terminal [`Outcome`]: transient faults are
/// retried according to the [`RetryPolicy`] and demoted to
/// [`FailureKind::RetriesExhausted`] once attempts run out.
pub struct SubmissionClient {
    http: Client,
    scan_url: String,
    status_url: String,
    submit_timeout: Duration,
    health_timeout: Duration,
    retry: RetryPolicy,
    dry_run: bool,
}

impl SubmissionClient {
    /// Create a new submission client
    ///
    /// # Arguments
    ///
    /// * `config` - API endpoint and timeout settings
    /// * `retry` - Retry policy for submissions
    /// * `dry_run` - When set, submissions are simulated and never sent
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig, retry: RetryPolicy, dry_run: bool) -> Result<Self> {
        let http = ClientBuilder::new()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.health_timeout_secs))
            .build()
            .map_err(|e| MigratorError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            scan_url: config.scan_url(),
            status_url: config.status_url(),
            submit_timeout: Duration::from_secs(config.submit_timeout_secs),
            health_timeout: Duration::from_secs(config.health_timeout_secs),
            retry,
            dry_run,
        })
    }

    /// Whether submissions are simulated
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// One POST with no retry
    async fn attempt(&self, url: &str) -> Outcome {
        let result = self
            .http
            .post(&self.scan_url)
            .timeout(self.submit_timeout)
            .json(&ScanRequest { qr_code: url })
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => return Outcome::TransientError(transport_reason(&e)),
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => classify_response(status, &body),
            Err(e) => Outcome::TransientError(format!("Failed to read response body: {e}")),
        }
    }
}

#[async_trait]
impl ScanService for SubmissionClient {
    async fn health_check(&self) -> Result<()> {
        let response = self
            .http
            .get(&self.status_url)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| MigratorError::Connection(transport_reason(&e)))?;

        if response.status() == StatusCode::OK {
            tracing::debug!(url = %self.status_url, "Scan service is healthy");
            Ok(())
        } else {
            Err(MigratorError::Remote(format!(
                "Health check returned HTTP {}",
                response.status().as_u16()
            )))
        }
    }

    async fn api_status(&self) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(&self.status_url)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| MigratorError::Connection(transport_reason(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MigratorError::Remote(format!(
                "Status endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| MigratorError::Serialization(format!("Invalid status document: {e}")))
    }

    async fn submit(&self, url: &str) -> Outcome {
        if self.dry_run {
            tracing::debug!(url = %url, "Dry run, skipping submission");
            return Outcome::simulated();
        }

        let max_attempts = self.retry.max_attempts();
        let mut last_reason = String::new();

        for attempt in 0..max_attempts {
            let outcome = self.attempt(url).await;
            if outcome.is_terminal() {
                return outcome;
            }

            if let Outcome::TransientError(reason) = outcome {
                if attempt < self.retry.max_retries {
                    let delay = self.retry.delay_for(attempt);
                    log_retry_attempt!(
                        attempt + 1,
                        max_attempts,
                        u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        &reason
                    );
                    tokio::time::sleep(delay).await;
                }
                last_reason = reason;
            }
        }

        Outcome::Failure {
            kind: FailureKind::RetriesExhausted,
            reason: last_reason,
        }
    }
}

/// Classify one HTTP exchange with the scan endpoint
///
/// Anything other than a 200 with a JSON body is transient. A parsed body is
/// terminal: rejection, duplicate, or success.
pub fn classify_response(status: u16, body: &str) -> Outcome {
    if status != 200 {
        return Outcome::TransientError(format!("HTTP {status}: {body}"));
    }

    let response: ScanResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return Outcome::TransientError(format!("Unexpected response body: {e}")),
    };

    if !response.success {
        let reason = response
            .error
            .or(response.message)
            .unwrap_or_else(|| "unknown error".to_string());
        return Outcome::rejected(reason);
    }

    if response.is_duplicate() {
        return Outcome::Duplicate {
            message: response.salva.and_then(|s| s.message),
        };
    }

    Outcome::Success {
        simulated: false,
        message: response.message,
    }
}

fn transport_reason(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timed out: {e}")
    } else if e.is_connect() {
        format!("Connection failed: {e}")
    } else {
        format!("Request failed: {e}")
    }
}
