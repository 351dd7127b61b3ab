//! Epoch rows written by the chain indexer.

use anyhow::Result;
use tracing::debug;

use super::records::EpochRecord;
use super::{from_sql_int, to_sql_int, Database};

impl Database {
    /// Latest indexed epoch, `None` before the indexer wrote anything.
    pub async fn latest_epoch(&self) -> Result<Option<u64>> {
        let latest: Option<i64> = sqlx::query_scalar("SELECT MAX(epoch) FROM epochs")
            .fetch_one(&self.pool)
            .await?;
        latest.map(from_sql_int).transpose()
    }

    pub async fn store_epoch(&self, record: &EpochRecord) -> Result<()> {
        debug!("Storing epoch {}", record.epoch);

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO epochs (
                epoch, validators_count, eligible_ether, voted_ether, finalized
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(to_sql_int(record.epoch)?)
        .bind(record.validators_count)
        .bind(record.eligible_ether)
        .bind(record.voted_ether)
        .bind(record.finalized)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
