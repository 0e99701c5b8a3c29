//! Wire types for the scan-processing service

use serde::{Deserialize, Serialize};

/// Values of `salva.status` that mean the receipt was already stored
pub const DUPLICATE_STATUSES: [&str; 2] = ["duplicada", "duplicate"];

/// Body of `POST /api/scan/process`
#[derive(Debug, Serialize)]
pub struct ScanRequest<'a> {
    /// Full lookup URL as printed in the receipt's QR code
    #[serde(rename = "qrCode")]
    pub qr_code: &'a str,
}

/// Response document returned by the scan endpoint
///
/// A missing `success` field is read as `false`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    /// Persistence result reported by the service
    #[serde(default)]
    pub salva: Option<SavedStatus>,
}

/// The `salva` sub-document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavedStatus {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl ScanResponse {
    /// Whether the service reported the receipt as already stored
    pub fn is_duplicate(&self) -> bool {
        self.salva
            .as_ref()
            .and_then(|s| s.status.as_deref())
            .is_some_and(|status| DUPLICATE_STATUSES.contains(&status))
    }
}
