//! Status reporter doubles

use anyhow::{bail, Result};
use async_trait::async_trait;
use statistics::services::{StatusReport, StatusReporter, StatusService, ServiceIdentity};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<StatusReport>>,
}

impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reports(&self) -> Vec<StatusReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    pub fn count_for(&self, name: &str) -> usize {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == name)
            .count()
    }

    /// Status service that only reports to this recorder
    pub fn service(self: &Arc<Self>) -> Arc<StatusService> {
        Arc::new(StatusService::new(ServiceIdentity::current()).with_reporter(self.clone()))
    }
}

#[async_trait]
impl StatusReporter for RecordingReporter {
    async fn report(&self, report: &StatusReport) -> Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

/// Always fails, to check that sink errors stay inside the status service
pub struct FailingReporter;

#[async_trait]
impl StatusReporter for FailingReporter {
    async fn report(&self, report: &StatusReport) -> Result<()> {
        bail!("status sink unavailable for {}", report.name)
    }
}
