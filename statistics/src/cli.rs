//! Command line surface.

use clap::Parser;
use std::path::PathBuf;

use crate::errors::ConfigError;
use crate::scheduler::{DaySelection, ExporterOptions};

/// Keeps day-indexed validator statistics and chart series caught up with the chain index
#[derive(Parser, Debug, Clone)]
#[command(name = "statistics", version)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, env = "STATISTICS_CONFIG")]
    pub config: PathBuf,

    /// Day to export statistics for, even if it has been exported already (-1 = not set)
    #[arg(long = "statistics.day", default_value_t = -1, allow_negative_numbers = true)]
    pub statistics_day: i64,

    /// Days to export statistics for as `first-last`, even if they have been exported already
    #[arg(long = "statistics.days", default_value = "")]
    pub statistics_days: String,

    /// Disable exporting pools
    #[arg(long = "pools.disabled")]
    pub pools_disabled: bool,

    /// Toggle exporting validator statistics
    #[arg(long = "validators.enabled")]
    pub validators_enabled: bool,

    /// Toggle exporting chart series
    #[arg(long = "charts.enabled")]
    pub charts_enabled: bool,
}

impl Cli {
    pub fn options(&self) -> ExporterOptions {
        ExporterOptions {
            validators_enabled: self.validators_enabled,
            charts_enabled: self.charts_enabled,
            pools_disabled: self.pools_disabled,
        }
    }

    /// Backfill selection, `None` when neither backfill flag selects work.
    pub fn backfill_selection(&self) -> Result<Option<DaySelection>, ConfigError> {
        DaySelection::from_flags(self.statistics_day, &self.statistics_days)
    }
}
