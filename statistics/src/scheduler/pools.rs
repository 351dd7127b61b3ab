use crate::constants::services;
use crate::services::{PoolRefresher, StatusService};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Refreshes the pool metadata snapshot on a fixed interval. No ledger, no
/// retries beyond the next tick.
pub struct PoolsLoop {
    refresher: Arc<dyn PoolRefresher>,
    status: Arc<StatusService>,
    interval: Duration,
}

impl PoolsLoop {
    pub fn new(
        refresher: Arc<dyn PoolRefresher>,
        status: Arc<StatusService>,
        interval: Duration,
    ) -> Self {
        Self {
            refresher,
            status,
            interval,
        }
    }

    pub async fn run(self, cancel: CancellationToken) {
        info!(
            "Pool info updater started with {}s interval",
            self.interval.as_secs()
        );

        loop {
            self.tick().await;

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Pool info updater stopped");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// Refresh once and report liveness. Returns whether the refresh succeeded.
    pub async fn tick(&self) -> bool {
        let (succeeded, metadata) = match self.refresher.refresh().await {
            Ok(pools) => {
                info!("Pool info refreshed for {} pools", pools);
                (true, json!({ "pools": pools }))
            }
            Err(e) => {
                error!("error updating pool info: {:#}", e);
                (false, json!({ "error": e.to_string() }))
            }
        };

        self.status
            .report_status(
                services::POOL_INFO_UPDATER,
                services::STATUS_RUNNING,
                Some(metadata),
            )
            .await;

        succeeded
    }
}
