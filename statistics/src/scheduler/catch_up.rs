use crate::constants::services;
use crate::database::Database;
use crate::datasets::{DatasetKind, DatasetWriter};
use crate::day_clock::{DayClock, DayReading};
use crate::services::StatusService;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use super::{format_day_ranges, KindOutcome};

/// Why a cycle attempted no day at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The indexer has not written any epoch yet.
    NoEpochs,
    /// Reading the chain head failed.
    EpochUnavailable,
    /// The chain is younger than one full day.
    NotReady { latest_epoch: u64, epochs_per_day: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    Skipped(SkipReason),
    Processed {
        latest_epoch: u64,
        previous_day: u64,
        outcomes: Vec<KindOutcome>,
    },
}

impl CycleReport {
    pub fn outcome(&self, kind: DatasetKind) -> Option<&KindOutcome> {
        match self {
            CycleReport::Processed { outcomes, .. } => outcomes.iter().find(|o| o.kind == kind),
            CycleReport::Skipped(_) => None,
        }
    }
}

/// Keeps every enabled dataset caught up to the last complete day.
///
/// Each cycle reads the ledger per kind and attempts, in increasing order,
/// every absent day below the ledger maximum and then every day from the one
/// after the maximum up to `previous_day`. The ledger is the only record of
/// progress, so a day that failed before a restart is picked up again by the
/// next process. Nothing about failures is written to the ledger.
pub struct CatchUpDriver {
    database: Arc<Database>,
    clock: DayClock,
    writers: Vec<Arc<dyn DatasetWriter>>,
    status: Arc<StatusService>,
    poll_interval: Duration,
}

impl CatchUpDriver {
    pub fn new(
        database: Arc<Database>,
        clock: DayClock,
        writers: Vec<Arc<dyn DatasetWriter>>,
        status: Arc<StatusService>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            database,
            clock,
            writers,
            status,
            poll_interval,
        }
    }

    /// Run cycles until `cancel` fires. A cycle in progress always finishes.
    pub async fn run(self, cancel: CancellationToken) {
        let kinds: Vec<String> = self.writers.iter().map(|w| w.kind().to_string()).collect();
        info!(
            "Statistics catch-up started for [{}] with {}s poll interval",
            kinds.join(", "),
            self.poll_interval.as_secs()
        );

        self.log_ledger_gaps().await;

        loop {
            self.run_cycle().await;

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Statistics catch-up stopped");
                    break;
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// Warn about days a previous process left behind below the ledger
    /// maximum. The cycles retry them like any other absent day.
    pub async fn log_ledger_gaps(&self) {
        for writer in &self.writers {
            let kind = writer.kind();
            match self.database.missing_days(kind).await {
                Ok(missing) if !missing.is_empty() => {
                    warn!(
                        kind = %kind,
                        "{} ledger has {} uncompleted days below its latest completed day, retrying them: {}",
                        kind,
                        missing.len(),
                        format_day_ranges(&missing)
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    error!(kind = %kind, "error scanning {} ledger for gaps: {}", kind, e);
                }
            }
        }
    }

    /// One poll cycle over every enabled kind.
    pub async fn run_cycle(&self) -> CycleReport {
        let latest_epoch = match self.database.latest_epoch().await {
            Ok(Some(epoch)) => epoch,
            Ok(None) => {
                info!("skipping exporting stats, no epoch has been indexed yet");
                return self.skip(SkipReason::NoEpochs).await;
            }
            Err(e) => {
                error!("error retrieving latest epoch from the db: {}", e);
                return self.skip(SkipReason::EpochUnavailable).await;
            }
        };

        let previous_day = match self.clock.read(latest_epoch) {
            DayReading::NotReady {
                latest_epoch,
                epochs_per_day,
            } => {
                info!(
                    "skipping exporting stats, first day has not been indexed yet (latest epoch {}, {} epochs per day)",
                    latest_epoch, epochs_per_day
                );
                return self
                    .skip(SkipReason::NotReady {
                        latest_epoch,
                        epochs_per_day,
                    })
                    .await;
            }
            DayReading::Ready { previous_day, .. } => previous_day,
        };

        let mut outcomes = Vec::with_capacity(self.writers.len());
        for writer in &self.writers {
            let outcome = self
                .catch_up_kind(writer.as_ref(), latest_epoch, previous_day)
                .await;
            self.status
                .report_status(
                    writer.kind().service_name(),
                    services::STATUS_RUNNING,
                    Some(json!({
                        "latest_epoch": latest_epoch,
                        "previous_day": previous_day,
                        "start_day": outcome.start_day,
                        "attempted": outcome.attempted.len(),
                        "failed": outcome.failed,
                    })),
                )
                .await;
            outcomes.push(outcome);
        }

        self.status
            .report_status(services::STATISTICS, services::STATUS_RUNNING, None)
            .await;

        CycleReport::Processed {
            latest_epoch,
            previous_day,
            outcomes,
        }
    }

    #[instrument(skip(self, writer), fields(kind = %writer.kind()))]
    async fn catch_up_kind(
        &self,
        writer: &dyn DatasetWriter,
        latest_epoch: u64,
        previous_day: u64,
    ) -> KindOutcome {
        let kind = writer.kind();
        let mut outcome = KindOutcome::new(kind);

        let last_completed = match self.database.last_completed_day(kind).await {
            Ok(last) => last,
            Err(e) => {
                error!(
                    "error retrieving latest exported {} day from the db: {}",
                    kind, e
                );
                return outcome;
            }
        };

        let start_day = last_completed.map_or(0, |day| day + 1);
        outcome.start_day = Some(start_day);

        info!(
            "{}: latest epoch is {}, previous day is {}, last exported day is {:?}, starting at {}",
            kind, latest_epoch, previous_day, last_completed, start_day
        );

        // Absent days below the maximum, left by failures in this or an earlier process
        let retries: Vec<u64> = match self.database.missing_days(kind).await {
            Ok(missing) => missing
                .into_iter()
                .filter(|day| *day <= previous_day)
                .collect(),
            Err(e) => {
                error!("error scanning {} ledger for uncompleted days: {}", kind, e);
                Vec::new()
            }
        };

        for day in retries {
            info!(day, "retrying {} for day {}", kind, day);
            attempt(writer, day, &mut outcome).await;
        }

        if start_day <= previous_day {
            for day in start_day..=previous_day {
                attempt(writer, day, &mut outcome).await;
            }
        }

        if !outcome.failed.is_empty() {
            warn!(
                "{}: {} of {} days failed this cycle and will be retried: {}",
                kind,
                outcome.failed.len(),
                outcome.attempted.len(),
                format_day_ranges(&outcome.failed)
            );
        }

        outcome
    }

    async fn skip(&self, reason: SkipReason) -> CycleReport {
        let metadata = json!({ "skipped": format!("{:?}", reason) });
        for writer in &self.writers {
            self.status
                .report_status(
                    writer.kind().service_name(),
                    services::STATUS_RUNNING,
                    Some(metadata.clone()),
                )
                .await;
        }
        self.status
            .report_status(services::STATISTICS, services::STATUS_RUNNING, None)
            .await;
        CycleReport::Skipped(reason)
    }
}

async fn attempt(writer: &dyn DatasetWriter, day: u64, outcome: &mut KindOutcome) {
    let kind = writer.kind();
    outcome.attempted.push(day);

    match writer.write_day(day).await {
        Ok(()) => info!(day, "exported {} for day {}", kind, day),
        Err(e) => {
            error!(day, "error exporting {} for day {}: {:#}", kind, day, e);
            outcome.failed.push(day);
        }
    }
}
