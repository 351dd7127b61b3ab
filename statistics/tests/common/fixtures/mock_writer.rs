//! Dataset writer double that records every call and fails on demand

use anyhow::{bail, Result};
use async_trait::async_trait;
use statistics::{Database, DatasetKind, DatasetWriter, DayStatus};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Records the days it is asked to write and the ledger state it saw at
/// that moment. On success it marks the day complete like a real writer.
pub struct RecordingWriter {
    kind: DatasetKind,
    database: Arc<Database>,
    calls: Mutex<Vec<(u64, DayStatus)>>,
    failing_days: Mutex<HashSet<u64>>,
    fail_all: Mutex<bool>,
}

impl RecordingWriter {
    pub fn new(kind: DatasetKind, database: Arc<Database>) -> Arc<Self> {
        Arc::new(Self {
            kind,
            database,
            calls: Mutex::new(Vec::new()),
            failing_days: Mutex::new(HashSet::new()),
            fail_all: Mutex::new(false),
        })
    }

    pub fn fail_on(&self, day: u64) {
        self.failing_days.lock().unwrap().insert(day);
    }

    pub fn succeed_on(&self, day: u64) {
        self.failing_days.lock().unwrap().remove(&day);
    }

    pub fn fail_everything(&self) {
        *self.fail_all.lock().unwrap() = true;
    }

    /// Days in call order
    pub fn calls(&self) -> Vec<u64> {
        self.calls.lock().unwrap().iter().map(|(day, _)| *day).collect()
    }

    /// Ledger state observed when each call started
    pub fn observed(&self) -> Vec<(u64, DayStatus)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl DatasetWriter for RecordingWriter {
    fn kind(&self) -> DatasetKind {
        self.kind
    }

    async fn write_day(&self, day: u64) -> Result<()> {
        let status = self.database.day_status(self.kind, day).await?;
        self.calls.lock().unwrap().push((day, status));

        let should_fail =
            *self.fail_all.lock().unwrap() || self.failing_days.lock().unwrap().contains(&day);
        if should_fail {
            bail!("simulated failure for day {}", day);
        }

        let mut conn = self.database.pool().acquire().await?;
        Database::mark_day_complete(&mut *conn, self.kind, day).await
    }
}
