//! In-memory source and scan service shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use nfce_migrator::adapters::scan::ScanService;
use nfce_migrator::adapters::source::RecordSource;
use nfce_migrator::core::migration::DriverSettings;
use nfce_migrator::domain::{MigratorError, Outcome, ReceiptRecord, Result};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

pub const QR_BASE: &str = "https://www.sefaz.mt.gov.br/nfce/consultanfce";

/// A receipt with all five lookup fields set
pub fn receipt(id: i64) -> ReceiptRecord {
    ReceiptRecord::builder(id)
        .access_key(format!("5124011234567800019065001{id:019}"))
        .document_version("2")
        .environment_code("1")
        .issuer_token_id("000001")
        .signature_digest(format!("sig{id}"))
        .created_at(format!("2024-01-{:02}T10:00:00Z", (id % 28) + 1))
        .build()
}

pub fn receipts(count: i64) -> Vec<ReceiptRecord> {
    (1..=count).map(receipt).collect()
}

pub fn settings(page_size: usize, failure_log: Option<PathBuf>) -> DriverSettings {
    DriverSettings {
        qr_base_url: QR_BASE.to_string(),
        page_size,
        failure_log_path: failure_log,
        failure_preview: 10,
    }
}

/// Calls observed by a [`MemorySource`]
#[derive(Debug, Default)]
pub struct SourceLog {
    pub connects: usize,
    pub disconnects: usize,
    pub pages: Vec<(usize, u64)>,
}

/// Serves a fixed, already ordered list of receipts
pub struct MemorySource {
    records: Vec<ReceiptRecord>,
    connected: bool,
    pub fail_connect: bool,
    pub fail_page_at: Option<u64>,
    pub log: Arc<Mutex<SourceLog>>,
}

impl MemorySource {
    pub fn new(records: Vec<ReceiptRecord>) -> Self {
        Self {
            records,
            connected: false,
            fail_connect: false,
            fail_page_at: None,
            log: Arc::new(Mutex::new(SourceLog::default())),
        }
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn connect(&mut self) -> Result<()> {
        self.log.lock().unwrap().connects += 1;
        if self.fail_connect {
            return Err(MigratorError::Connection("database unreachable".to_string()));
        }
        self.connected = true;
        Ok(())
    }

    async fn total_eligible(&self) -> Result<u64> {
        if !self.connected {
            return Err(MigratorError::Connection("not connected".to_string()));
        }
        Ok(self.records.len() as u64)
    }

    async fn page(&self, limit: usize, offset: u64) -> Result<Vec<ReceiptRecord>> {
        self.log.lock().unwrap().pages.push((limit, offset));
        if self.fail_page_at == Some(offset) {
            return Err(MigratorError::Source("disk I/O error".to_string()));
        }
        Ok(self
            .records
            .iter()
            .skip(offset as usize)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.log.lock().unwrap().disconnects += 1;
        self.connected = false;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory ({} receipts)", self.records.len())
    }
}

/// Answers submissions from a script, then with plain successes
pub struct ScriptedScan {
    script: Mutex<VecDeque<Outcome>>,
    pub healthy: bool,
    status_available: bool,
    pub status_requests: Arc<Mutex<usize>>,
    pub submitted: Arc<Mutex<Vec<String>>>,
    shutdown_after: Option<(usize, watch::Sender<bool>)>,
}

impl ScriptedScan {
    pub fn new(script: Vec<Outcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            healthy: true,
            status_available: true,
            status_requests: Arc::new(Mutex::new(0)),
            submitted: Arc::new(Mutex::new(Vec::new())),
            shutdown_after: None,
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new(Vec::new())
        }
    }

    /// Healthy, but the status endpoint answers with an error
    pub fn without_status(mut self) -> Self {
        self.status_available = false;
        self
    }

    /// Raise the shutdown signal once `count` submissions have been made
    pub fn shutdown_after(mut self, count: usize, sender: watch::Sender<bool>) -> Self {
        self.shutdown_after = Some((count, sender));
        self
    }
}

#[async_trait]
impl ScanService for ScriptedScan {
    async fn health_check(&self) -> Result<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(MigratorError::Remote("Health check returned HTTP 503".to_string()))
        }
    }

    async fn api_status(&self) -> Result<serde_json::Value> {
        *self.status_requests.lock().unwrap() += 1;
        if self.status_available {
            Ok(serde_json::json!({ "status": "ok" }))
        } else {
            Err(MigratorError::Remote("Status endpoint returned HTTP 404".to_string()))
        }
    }

    async fn submit(&self, url: &str) -> Outcome {
        let count = {
            let mut submitted = self.submitted.lock().unwrap();
            submitted.push(url.to_string());
            submitted.len()
        };

        if let Some((after, sender)) = &self.shutdown_after {
            if count == *after {
                sender.send(true).unwrap();
            }
        }

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Outcome::Success {
                simulated: false,
                message: Some("ok".to_string()),
            })
    }
}
