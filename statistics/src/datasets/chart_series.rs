//! Per-day chart series points.

use anyhow::{bail, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{DatasetKind, DatasetWriter};
use crate::constants::indicators;
use crate::database::{to_sql_int, ChartPoint, Database};
use crate::day_clock::DayClock;

pub struct ChartSeriesWriter {
    database: Arc<Database>,
    clock: DayClock,
}

impl ChartSeriesWriter {
    pub fn new(database: Arc<Database>, clock: DayClock) -> Self {
        Self { database, clock }
    }

    async fn points(&self, day: u64) -> Result<Vec<ChartPoint>> {
        let (first, end) = self.clock.epoch_range(day);
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS epochs_indexed,
                   SUM(CASE WHEN finalized THEN 1 ELSE 0 END) AS finalized_epochs,
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

        let finalized: i64 = row.try_get::<Option<i64>, _>("finalized_epochs")?.unwrap_or(0);
        let avg_validators: f64 = row.try_get::<Option<f64>, _>("avg_validators")?.unwrap_or(0.0);
        let voted: i64 = row.try_get::<Option<i64>, _>("voted_ether")?.unwrap_or(0);
        let eligible: i64 = row.try_get::<Option<i64>, _>("eligible_ether")?.unwrap_or(0);
        let participation = if eligible > 0 {
            voted as f64 / eligible as f64
        } else {
            0.0
        };

        Ok([
            (indicators::AVG_VALIDATORS, avg_validators),
            (indicators::PARTICIPATION_RATE, participation),
            (indicators::EPOCHS_INDEXED, epochs_indexed as f64),
            (indicators::FINALIZED_EPOCHS, finalized as f64),
        ]
        .into_iter()
        .map(|(indicator, value)| ChartPoint {
            day,
            indicator: indicator.to_string(),
            value,
        })
        .collect())
    }
}

#[async_trait]
impl DatasetWriter for ChartSeriesWriter {
    fn kind(&self) -> DatasetKind {
        DatasetKind::ChartSeries
    }

    #[instrument(skip(self))]
    async fn write_day(&self, day: u64) -> Result<()> {
        let points = self.points(day).await?;
        let day_key = to_sql_int(day)?;

        let mut tx = self.database.pool().begin().await?;

        sqlx::query("DELETE FROM chart_series WHERE day = ?")
            .bind(day_key)
            .execute(&mut *tx)
            .await?;

        for point in &points {
            sqlx::query("INSERT INTO chart_series (day, indicator, value) VALUES (?, ?, ?)")
                .bind(day_key)
                .bind(&point.indicator)
                .bind(point.value)
                .execute(&mut *tx)
                .await?;
        }

        Database::mark_day_complete(&mut *tx, self.kind(), day).await?;
        tx.commit().await?;

        debug!("Wrote {} chart points for day {}", points.len(), day);
        Ok(())
    }
}

impl Database {
    pub async fn get_chart_series(&self, day: u64) -> Result<Vec<ChartPoint>> {
        let rows = sqlx::query(
            "SELECT indicator, value FROM chart_series WHERE day = ? ORDER BY indicator ASC",
        )
        .bind(to_sql_int(day)?)
        .fetch_all(self.pool())
        .await?;

        let mut points = Vec::with_capacity(rows.len());
        for row in rows {
            points.push(ChartPoint {
                day,
                indicator: row.try_get("indicator")?,
                value: row.try_get("value")?,
            });
        }
        Ok(points)
    }
}
