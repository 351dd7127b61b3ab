// File: statistics/src/services/status_service.rs
//
// Liveness reporting for the background loops. Every loop reports after each
// cycle; sinks are the `service_status` table and an optional webhook.
//
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::StatusConfig;
use crate::database::{Database, ServiceStatusRecord};

/// Who is reporting. One identity per process.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceIdentity {
    pub instance_id: String,
    pub executable: String,
    pub version: String,
    pub pid: u32,
}

impl ServiceIdentity {
    pub fn current() -> Self {
        let executable = std::env::current_exe()
            .ok()
            .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

        Self {
            instance_id: Uuid::new_v4().to_string(),
            executable,
            version: env!("CARGO_PKG_VERSION").to_string(),
            pid: std::process::id(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub name: String,
    pub status: String,
    pub metadata: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub identity: ServiceIdentity,
}

/// A liveness sink.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    async fn report(&self, report: &StatusReport) -> Result<()>;
}

pub struct DatabaseStatusReporter {
    database: Arc<Database>,
}

impl DatabaseStatusReporter {
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl StatusReporter for DatabaseStatusReporter {
    async fn report(&self, report: &StatusReport) -> Result<()> {
        let record = ServiceStatusRecord {
            name: report.name.clone(),
            instance_id: report.identity.instance_id.clone(),
            executable: report.identity.executable.clone(),
            version: report.identity.version.clone(),
            pid: i64::from(report.identity.pid),
            status: report.status.clone(),
            metadata: report
                .metadata
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            last_update: report.timestamp,
        };
        self.database.store_service_status(&record).await
    }
}

pub struct WebhookStatusReporter {
    webhook_url: String,
    client: Client,
    request_timeout: Duration,
}

impl WebhookStatusReporter {
    pub fn new(webhook_url: String, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client for status webhook: {}", e))?;

        Ok(Self {
            webhook_url,
            client,
            request_timeout,
        })
    }

    pub fn get_webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl StatusReporter for WebhookStatusReporter {
    async fn report(&self, report: &StatusReport) -> Result<()> {
        match timeout(
            self.request_timeout,
            self.client.post(&self.webhook_url).json(report).send(),
        )
        .await
        {
            Ok(Ok(response)) => {
                if response.status().is_success() {
                    debug!("Status webhook accepted report for {}", report.name);
                    Ok(())
                } else {
                    Err(anyhow!(
                        "status webhook returned {} for {}",
                        response.status(),
                        report.name
                    ))
                }
            }
            Ok(Err(e)) => Err(anyhow!("failed to send status for {}: {}", report.name, e)),
            Err(_) => Err(anyhow!("status webhook timeout for {}", report.name)),
        }
    }
}

/// Fans a status out to every configured sink. Sink failures are logged and
/// never reach the caller.
pub struct StatusService {
    identity: ServiceIdentity,
    reporters: Vec<Arc<dyn StatusReporter>>,
}

impl StatusService {
    pub fn new(identity: ServiceIdentity) -> Self {
        Self {
            identity,
            reporters: Vec::new(),
        }
    }

    /// Database sink always, webhook sink when configured.
    pub fn from_config(status: &StatusConfig, database: Arc<Database>) -> Result<Self> {
        let mut service = Self::new(ServiceIdentity::current())
            .with_reporter(Arc::new(DatabaseStatusReporter::new(database)));

        match &status.webhook_url {
            Some(url) => {
                let webhook = WebhookStatusReporter::new(url.clone(), status.webhook_timeout())?;
                info!("Status webhook enabled: {}", webhook.get_webhook_url());
                service = service.with_reporter(Arc::new(webhook));
            }
            None => debug!("No status webhook configured"),
        }

        Ok(service)
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn StatusReporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn reporter_count(&self) -> usize {
        self.reporters.len()
    }

    pub async fn report_status(
        &self,
        name: &str,
        status: &str,
        metadata: Option<serde_json::Value>,
    ) {
        let report = StatusReport {
            name: name.to_string(),
            status: status.to_string(),
            metadata,
            timestamp: Utc::now(),
            identity: self.identity.clone(),
        };

        for reporter in &self.reporters {
            if let Err(e) = reporter.report(&report).await {
                warn!("Failed to report status for {}: {}", name, e);
            }
        }
    }
}
