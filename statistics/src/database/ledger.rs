//! Status ledger operations.
//!
//! One table per dataset kind, one `(day, status)` row per completed day.
//! Rows are only inserted by writers inside the transaction that persists the
//! day, and only deleted by the backfill path ahead of a recomputation.

use anyhow::Result;
use sqlx::SqliteConnection;
use tracing::{debug, error, warn};

use super::{from_sql_int, to_sql_int, Database};
use crate::datasets::{DatasetKind, DayStatus};

impl Database {
    /// Highest day marked complete, `None` while the ledger is empty.
    pub async fn last_completed_day(&self, kind: DatasetKind) -> Result<Option<u64>> {
        let sql = format!("SELECT MAX(day) FROM {} WHERE status", kind.status_table());
        let max_day: Option<i64> = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        debug!("Last completed {} day: {:?}", kind, max_day);
        max_day.map(from_sql_int).transpose()
    }

    pub async fn day_status(&self, kind: DatasetKind, day: u64) -> Result<DayStatus> {
        let sql = format!("SELECT status FROM {} WHERE day = ?", kind.status_table());
        let status: Option<bool> = sqlx::query_scalar(&sql)
            .bind(to_sql_int(day)?)
            .fetch_optional(&self.pool)
            .await?;

        match status {
            Some(true) => Ok(DayStatus::Complete),
            Some(false) => {
                warn!(
                    "Found incomplete {} ledger row for day {}, treating it as absent",
                    kind, day
                );
                Ok(DayStatus::Absent)
            }
            None => Ok(DayStatus::Absent),
        }
    }

    /// All completed days in increasing order.
    pub async fn completed_days(&self, kind: DatasetKind) -> Result<Vec<u64>> {
        let sql = format!(
            "SELECT day FROM {} WHERE status ORDER BY day ASC",
            kind.status_table()
        );
        let days: Vec<i64> = sqlx::query_scalar(&sql).fetch_all(&self.pool).await?;
        days.into_iter().map(from_sql_int).collect()
    }

    /// Days below the ledger maximum that were never completed.
    pub async fn missing_days(&self, kind: DatasetKind) -> Result<Vec<u64>> {
        let completed = self.completed_days(kind).await?;
        let mut missing = Vec::new();
        let mut expected = 0u64;
        for day in completed {
            missing.extend(expected..day);
            expected = day + 1;
        }
        Ok(missing)
    }

    /// Delete the ledger entry for `day`. Returns the number of rows removed.
    pub async fn reset_day(&self, kind: DatasetKind, day: u64) -> Result<u64> {
        let sql = format!("DELETE FROM {} WHERE day = ?", kind.status_table());
        match sqlx::query(&sql)
            .bind(to_sql_int(day)?)
            .execute(&self.pool)
            .await
        {
            Ok(result) => {
                debug!(
                    "Reset {} status for day {} ({} rows)",
                    kind,
                    day,
                    result.rows_affected()
                );
                Ok(result.rows_affected())
            }
            Err(e) => {
                error!("Failed to reset {} status for day {}: {}", kind, day, e);
                Err(e.into())
            }
        }
    }

    /// Mark `day` complete. Call on the connection or transaction that
    /// persisted the day's rows so both commit together.
    pub async fn mark_day_complete(
        conn: &mut SqliteConnection,
        kind: DatasetKind,
        day: u64,
    ) -> Result<()> {
        let sql = format!(
            "INSERT OR REPLACE INTO {} (day, status) VALUES (?, 1)",
            kind.status_table()
        );
        sqlx::query(&sql)
            .bind(to_sql_int(day)?)
            .execute(conn)
            .await?;
        debug!("Marked {} day {} complete", kind, day);
        Ok(())
    }
}
