pub mod manager;
use serde::{Deserialize, Serialize};
use std::time::Duration;
pub use manager::ConfigManager;

use crate::constants::{chain, intervals};
use crate::errors::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chain: ChainConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub statistics: StatisticsConfig,
    #[serde(default)]
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub seconds_per_slot: u64,
    pub slots_per_epoch: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_pools_interval")]
    pub pools_interval_seconds: u64,
}

fn default_poll_interval() -> u64 {
    intervals::STATISTICS_POLL.as_secs()
}

fn default_pools_interval() -> u64 {
    intervals::POOLS_REFRESH.as_secs()
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            pools_interval_seconds: default_pools_interval(),
        }
    }
}

impl StatisticsConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn pools_interval(&self) -> Duration {
        Duration::from_secs(self.pools_interval_seconds)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusConfig {
    pub webhook_url: Option<String>,
    pub webhook_timeout_seconds: Option<u64>,
}

impl StatusConfig {
    pub fn webhook_timeout(&self) -> Duration {
        self.webhook_timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(intervals::STATUS_WEBHOOK_TIMEOUT)
    }
}

impl Config {
    /// Reject values the scheduler cannot work with. Runs once at load time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.seconds_per_slot == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain.seconds_per_slot".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.chain.slots_per_epoch == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain.slots_per_epoch".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if chain::SECONDS_PER_DAY / self.chain.seconds_per_slot / self.chain.slots_per_epoch == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain".to_string(),
                reason: format!(
                    "{}s slots with {} slots per epoch leave less than one epoch per day",
                    self.chain.seconds_per_slot, self.chain.slots_per_epoch
                ),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "database.path".to_string(),
            });
        }
        if self.statistics.poll_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "statistics.poll_interval_seconds".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.statistics.pools_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "statistics.pools_interval_seconds".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if let Some(url) = &self.status.webhook_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    field: "status.webhook_url".to_string(),
                    reason: format!("'{}' is not an http(s) URL", url),
                });
            }
        }
        Ok(())
    }
}
