//! Scan-processing service integration
//!
//! The migration target accepts a receipt's QR-code URL and stores the
//! receipt it points to. [`ScanService`] is the seam the migration driver
//! depends on; [`SubmissionClient`] is the HTTP implementation.

pub mod client;
pub mod models;

pub use client::{classify_response, RetryPolicy, SubmissionClient};
pub use models::{SavedStatus, ScanRequest, ScanResponse};

use crate::domain::{Outcome, Result};
use async_trait::async_trait;

/// Remote endpoint that receives derived lookup URLs
#[async_trait]
pub trait ScanService: Send + Sync {
    /// Verify the service is reachable and healthy
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or not healthy.
    async fn health_check(&self) -> Result<()>;

    /// Fetch the service's self-reported status document
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable, answers with a non-2xx
    /// status, or the body is not JSON.
    async fn api_status(&self) -> Result<serde_json::Value>;

    /// Submit one lookup URL
    ///
    /// Never returns [`Outcome::TransientError`]; retry is the
    /// implementation's concern.
    async fn submit(&self, url: &str) -> Outcome;
}
