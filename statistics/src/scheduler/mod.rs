//! Day-indexed catch-up scheduling
//!
//! This module drives the derived datasets forward:
//! - [`CatchUpDriver`] keeps each enabled dataset's ledger caught up to the
//!   last complete day, polling every minute
//! - [`Backfill`] forces recomputation of an explicit day or day range and
//!   returns
//! - [`PoolsLoop`] refreshes the pool metadata snapshot every ten minutes
//!
//! The loops are independent tokio tasks. Each one finishes its cycle before
//! sleeping and stops when its cancellation token fires.

pub mod backfill;
pub mod catch_up;
pub mod pools;

pub use backfill::{Backfill, DaySelection};
pub use catch_up::{CatchUpDriver, CycleReport, SkipReason};
pub use pools::PoolsLoop;

use crate::database::Database;
use crate::datasets::{ChartSeriesWriter, DatasetKind, DatasetWriter, ValidatorStatisticsWriter};
use crate::day_clock::DayClock;
use std::sync::Arc;

/// Process options taken from the command line. Passed by value into each
/// loop; nothing is stored globally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExporterOptions {
    pub validators_enabled: bool,
    pub charts_enabled: bool,
    pub pools_disabled: bool,
}

impl ExporterOptions {
    pub fn is_enabled(&self, kind: DatasetKind) -> bool {
        match kind {
            DatasetKind::ValidatorStatistics => self.validators_enabled,
            DatasetKind::ChartSeries => self.charts_enabled,
        }
    }

    pub fn enabled_kinds(&self) -> Vec<DatasetKind> {
        DatasetKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}

/// Writers for every enabled dataset kind, in a fixed order.
pub fn dataset_writers(
    options: &ExporterOptions,
    database: Arc<Database>,
    clock: DayClock,
) -> Vec<Arc<dyn DatasetWriter>> {
    options
        .enabled_kinds()
        .into_iter()
        .map(|kind| -> Arc<dyn DatasetWriter> {
            match kind {
                DatasetKind::ValidatorStatistics => {
                    Arc::new(ValidatorStatisticsWriter::new(database.clone(), clock))
                }
                DatasetKind::ChartSeries => Arc::new(ChartSeriesWriter::new(database.clone(), clock)),
            }
        })
        .collect()
}

/// What happened to one dataset kind during a cycle or a backfill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindOutcome {
    pub kind: DatasetKind,
    /// First day of the range; `None` when the ledger could not be read.
    pub start_day: Option<u64>,
    /// Days handed to the writer, in the order they were attempted.
    pub attempted: Vec<u64>,
    pub failed: Vec<u64>,
}

impl KindOutcome {
    pub fn new(kind: DatasetKind) -> Self {
        Self {
            kind,
            start_day: None,
            attempted: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> Vec<u64> {
        self.attempted
            .iter()
            .copied()
            .filter(|day| !self.failed.contains(day))
            .collect()
    }
}

/// Render sorted days compactly, e.g. `0-3, 7, 9-10`.
pub fn format_day_ranges(days: &[u64]) -> String {
    let mut parts = Vec::new();
    let mut iter = days.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while let Some(&next) = iter.peek() {
            if next == end + 1 {
                end = next;
                iter.next();
            } else {
                break;
            }
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
    }

    parts.join(", ")
}
