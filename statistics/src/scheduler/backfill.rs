use crate::database::Database;
use crate::datasets::DatasetWriter;
use crate::errors::{BackfillError, ConfigError};
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{error, info};

use super::KindOutcome;

/// Days selected for a forced recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySelection {
    Single(u64),
    Range { first: u64, last: u64 },
}

impl DaySelection {
    /// Build the selection from the `statistics.day` / `statistics.days`
    /// flags. A non-empty range wins; a negative day means "not set".
    pub fn from_flags(day: i64, days: &str) -> Result<Option<Self>, ConfigError> {
        if !days.trim().is_empty() {
            return Self::parse_range(days).map(Some);
        }
        if day >= 0 {
            return Ok(Some(DaySelection::Single(day as u64)));
        }
        Ok(None)
    }

    /// Parse `first-last`.
    pub fn parse_range(input: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidDayRange {
            input: input.to_string(),
            reason,
        };

        let parts: Vec<&str> = input.trim().split('-').collect();
        if parts.len() < 2 {
            return Err(invalid("expected two dash-separated days, e.g. 5-7".to_string()));
        }
        if parts.len() > 2 {
            return Err(invalid("expected exactly two dash-separated days".to_string()));
        }

        let first = parts[0]
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(format!("first day '{}': {}", parts[0], e)))?;
        let last = parts[1]
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(format!("last day '{}': {}", parts[1], e)))?;

        if first > last {
            return Err(invalid(format!(
                "first day {} is after last day {}",
                first, last
            )));
        }

        Ok(DaySelection::Range { first, last })
    }

    pub fn days(&self) -> RangeInclusive<u64> {
        match *self {
            DaySelection::Single(day) => day..=day,
            DaySelection::Range { first, last } => first..=last,
        }
    }
}

/// One-shot forced recomputation of explicit days, ignoring the ledger and
/// the day clock.
pub struct Backfill {
    database: Arc<Database>,
    writers: Vec<Arc<dyn DatasetWriter>>,
}

impl Backfill {
    pub fn new(database: Arc<Database>, writers: Vec<Arc<dyn DatasetWriter>>) -> Self {
        Self { database, writers }
    }

    /// For every selected kind and every day in increasing order: delete the
    /// ledger entry, then run the writer. A failed delete aborts the whole
    /// backfill; a failed write is logged and the next day proceeds.
    pub async fn run(&self, selection: DaySelection) -> Result<Vec<KindOutcome>, BackfillError> {
        let days = selection.days();
        let mut outcomes = Vec::with_capacity(self.writers.len());

        for writer in &self.writers {
            let kind = writer.kind();
            let mut outcome = KindOutcome::new(kind);
            outcome.start_day = Some(*days.start());

            info!(
                "exporting {} for days {}-{}",
                kind,
                days.start(),
                days.end()
            );

            for day in days.clone() {
                if let Err(e) = self.database.reset_day(kind, day).await {
                    error!(day, kind = %kind, "error resetting {} status for day {}: {}", kind, day, e);
                    return Err(BackfillError::LedgerResetFailed {
                        kind: kind.to_string(),
                        day,
                        reason: e.to_string(),
                    });
                }

                outcome.attempted.push(day);
                match writer.write_day(day).await {
                    Ok(()) => info!(day, kind = %kind, "exported {} for day {}", kind, day),
                    Err(e) => {
                        error!(day, kind = %kind, "error exporting {} for day {}: {:#}", kind, day, e);
                        outcome.failed.push(day);
                    }
                }
            }

            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
