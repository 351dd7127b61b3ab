//! Day-indexed derived datasets.
//!
//! Each [`DatasetKind`] owns its own status ledger table and writer. The
//! writers are the only code that marks a ledger entry complete, and they do
//! it in the same transaction that persists the day's rows.

pub mod chart_series;
pub mod validator_statistics;

pub use chart_series::ChartSeriesWriter;
pub use validator_statistics::ValidatorStatisticsWriter;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{services, tables};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DatasetKind {
    ValidatorStatistics,
    ChartSeries,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::ValidatorStatistics, DatasetKind::ChartSeries];

    /// Ledger table holding `(day, status)` rows for this kind.
    pub fn status_table(&self) -> &'static str {
        match self {
            DatasetKind::ValidatorStatistics => tables::VALIDATOR_STATS_STATUS,
            DatasetKind::ChartSeries => tables::CHART_SERIES_STATUS,
        }
    }

    /// Service name used for liveness reports.
    pub fn service_name(&self) -> &'static str {
        match self {
            DatasetKind::ValidatorStatistics => services::VALIDATOR_STATISTICS,
            DatasetKind::ChartSeries => services::CHART_SERIES,
        }
    }

    /// CLI flag that enables this kind.
    pub fn flag(&self) -> &'static str {
        match self {
            DatasetKind::ValidatorStatistics => "validators.enabled",
            DatasetKind::ChartSeries => "charts.enabled",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::ValidatorStatistics => write!(f, "validator statistics"),
            DatasetKind::ChartSeries => write!(f, "chart series"),
        }
    }
}

/// Ledger state of one `(day, kind)`. There is no failed state: a failed
/// computation leaves the entry absent so the day is picked up again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    Absent,
    Complete,
}

/// Computes and persists one day of a derived dataset.
///
/// On success the implementation must have marked the ledger entry for
/// `(day, self.kind())` complete. On failure it must leave it absent.
#[async_trait]
pub trait DatasetWriter: Send + Sync {
    fn kind(&self) -> DatasetKind;

    async fn write_day(&self, day: u64) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_use_separate_ledgers() {
        assert_ne!(
            DatasetKind::ValidatorStatistics.status_table(),
            DatasetKind::ChartSeries.status_table()
        );
        assert_ne!(
            DatasetKind::ValidatorStatistics.service_name(),
            DatasetKind::ChartSeries.service_name()
        );
    }

    #[test]
    fn test_flags_match_cli() {
        assert_eq!(DatasetKind::ValidatorStatistics.flag(), "validators.enabled");
        assert_eq!(DatasetKind::ChartSeries.flag(), "charts.enabled");
    }

    #[test]
    fn test_display() {
        assert_eq!(DatasetKind::ChartSeries.to_string(), "chart series");
        assert_eq!(
            DatasetKind::ValidatorStatistics.to_string(),
            "validator statistics"
        );
    }
}
