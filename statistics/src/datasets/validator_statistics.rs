//! Per-day validator statistics.
//!
//! Aggregates the epochs of one day into a single `validator_stats` row and
//! marks the day complete in `validator_stats_status`, in one transaction.

use anyhow::{bail, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{DatasetKind, DatasetWriter};
use crate::database::{to_sql_int, Database, ValidatorStatsRecord};
use crate::day_clock::DayClock;

pub struct ValidatorStatisticsWriter {
    database: Arc<Database>,
    clock: DayClock,
}

impl ValidatorStatisticsWriter {
    pub fn new(database: Arc<Database>, clock: DayClock) -> Self {
        Self { database, clock }
    }

    async fn aggregate(&self, day: u64) -> Result<ValidatorStatsRecord> {
        let (first, end) = self.clock.epoch_range(day);
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS epochs_indexed,
                   MIN(validators_count) AS min_validators,
                   MAX(validators_count) AS max_validators,
                   AVG(validators_count) AS avg_validators,
                   SUM(voted_ether) AS voted_ether,
                   SUM(eligible_ether) AS eligible_ether
            FROM epochs
            WHERE epoch >= ? AND epoch < ?
            "#,
        )
        .bind(to_sql_int(first)?)
        .bind(to_sql_int(end)?)
        .fetch_one(self.database.pool())
        .await?;

        let epochs_indexed: i64 = row.try_get("epochs_indexed")?;
        if epochs_indexed == 0 {
            bail!("no epochs indexed for day {} (epochs {}..{})", day, first, end);
        }

        let voted: i64 = row.try_get::<Option<i64>, _>("voted_ether")?.unwrap_or(0);
        let eligible: i64 = row.try_get::<Option<i64>, _>("eligible_ether")?.unwrap_or(0);
        let participation_rate = if eligible > 0 {
            voted as f64 / eligible as f64
        } else {
            0.0
        };

        Ok(ValidatorStatsRecord {
            day,
            epochs_indexed,
            min_validators: row.try_get::<Option<i64>, _>("min_validators")?.unwrap_or(0),
            max_validators: row.try_get::<Option<i64>, _>("max_validators")?.unwrap_or(0),
            avg_validators: row.try_get::<Option<f64>, _>("avg_validators")?.unwrap_or(0.0),
            participation_rate,
        })
    }
}

#[async_trait]
impl DatasetWriter for ValidatorStatisticsWriter {
    fn kind(&self) -> DatasetKind {
        DatasetKind::ValidatorStatistics
    }

    #[instrument(skip(self))]
    async fn write_day(&self, day: u64) -> Result<()> {
        let record = self.aggregate(day).await?;
        let day_key = to_sql_int(day)?;

        let mut tx = self.database.pool().begin().await?;

        sqlx::query("DELETE FROM validator_stats WHERE day = ?")
            .bind(day_key)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO validator_stats (
                day, epochs_indexed, min_validators, max_validators,
                avg_validators, participation_rate
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(day_key)
        .bind(record.epochs_indexed)
        .bind(record.min_validators)
        .bind(record.max_validators)
        .bind(record.avg_validators)
        .bind(record.participation_rate)
        .execute(&mut *tx)
        .await?;

        Database::mark_day_complete(&mut *tx, self.kind(), day).await?;
        tx.commit().await?;

        debug!(
            "Validator statistics for day {}: {} epochs, avg {:.1} validators, participation {:.4}",
            day, record.epochs_indexed, record.avg_validators, record.participation_rate
        );
        Ok(())
    }
}

impl Database {
    pub async fn get_validator_stats(&self, day: u64) -> Result<Option<ValidatorStatsRecord>> {
        let row = sqlx::query(
            r#"
            SELECT day, epochs_indexed, min_validators, max_validators,
                   avg_validators, participation_rate
            FROM validator_stats
            WHERE day = ?
            "#,
        )
        .bind(to_sql_int(day)?)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(ValidatorStatsRecord {
                day,
                epochs_indexed: row.try_get("epochs_indexed")?,
                min_validators: row.try_get("min_validators")?,
                max_validators: row.try_get("max_validators")?,
                avg_validators: row.try_get("avg_validators")?,
                participation_rate: row.try_get("participation_rate")?,
            })),
            None => Ok(None),
        }
    }
}
