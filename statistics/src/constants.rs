//! Application-wide constants for chain timing, polling intervals and table names
//!
//! Central place for the magic numbers used by the scheduler loops and the
//! persistence layer.

use std::time::Duration;

/// Chain timing constants
pub mod chain {
    /// Length of one calendar day in seconds, the unit a "day" bucket approximates
    pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
}

/// Polling intervals for the background loops
pub mod intervals {
    use super::Duration;

    /// Sleep between two catch-up cycles
    pub const STATISTICS_POLL: Duration = Duration::from_secs(60);

    /// Sleep between two pool metadata refreshes
    pub const POOLS_REFRESH: Duration = Duration::from_secs(600);

    /// Default timeout for status webhook requests
    pub const STATUS_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Names used when reporting liveness to the status sink
pub mod services {
    /// Catch-up loop as a whole
    pub const STATISTICS: &str = "statistics";

    /// Validator statistics catch-up
    pub const VALIDATOR_STATISTICS: &str = "statistics.validators";

    /// Chart series catch-up
    pub const CHART_SERIES: &str = "statistics.charts";

    /// Pool metadata refresh loop
    pub const POOL_INFO_UPDATER: &str = "poolInfoUpdater";

    /// Status value reported by a healthy loop
    pub const STATUS_RUNNING: &str = "Running";
}

/// Table names
pub mod tables {
    pub const VALIDATOR_STATS_STATUS: &str = "validator_stats_status";
    pub const CHART_SERIES_STATUS: &str = "chart_series_status";
}

/// Chart series indicator names written per day
pub mod indicators {
    pub const AVG_VALIDATORS: &str = "AVG_VALIDATORS";
    pub const PARTICIPATION_RATE: &str = "PARTICIPATION_RATE";
    pub const EPOCHS_INDEXED: &str = "EPOCHS_INDEXED";
    pub const FINALIZED_EPOCHS: &str = "FINALIZED_EPOCHS";
}
