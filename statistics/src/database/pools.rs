//! Pool membership and the pool metadata snapshot.

use anyhow::Result;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use super::records::{PoolInfoRecord, ValidatorPoolRecord};
use super::Database;

impl Database {
    pub async fn store_validator_pool(&self, record: &ValidatorPoolRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO validator_pools (validator_index, pool, balance, active)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.validator_index)
        .bind(&record.pool)
        .bind(record.balance)
        .bind(record.active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Replace the whole `pool_info` snapshot in one transaction. Returns the
    /// number of pools written.
    pub async fn refresh_pool_info(&self) -> Result<u64> {
        let updated_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM pool_info")
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO pool_info (pool, validators, active_validators, total_balance, updated_at)
            SELECT pool,
                   COUNT(*),
                   SUM(CASE WHEN active THEN 1 ELSE 0 END),
                   SUM(balance),
                   ?
            FROM validator_pools
            GROUP BY pool
            "#,
        )
        .bind(updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!("Pool info snapshot rebuilt with {} pools", result.rows_affected());
        Ok(result.rows_affected())
    }

    pub async fn get_pool_info(&self) -> Result<Vec<PoolInfoRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT pool, validators, active_validators, total_balance, updated_at
            FROM pool_info
            ORDER BY pool ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(PoolInfoRecord {
                pool: row.try_get("pool")?,
                validators: row.try_get("validators")?,
                active_validators: row.try_get("active_validators")?,
                total_balance: row.try_get("total_balance")?,
                updated_at: row.try_get("updated_at")?,
            });
        }
        Ok(records)
    }
}
