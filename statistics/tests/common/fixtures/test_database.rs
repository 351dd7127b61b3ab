//! Test database utilities for in-memory SQLite testing

use statistics::database::{EpochRecord, ValidatorPoolRecord};
use statistics::{Database, DatasetKind};
use std::sync::Arc;

use super::test_data::{epoch_record, head_of_day};

/// Fresh in-memory database with the full schema
pub async fn test_database() -> Arc<Database> {
    Arc::new(
        Database::new(":memory:")
            .await
            .expect("Failed to create test database"),
    )
}

/// Store only the chain head, enough for the day clock
pub async fn set_chain_head(db: &Database, latest_epoch: u64) {
    db.store_epoch(&epoch_record(latest_epoch, 1_000))
        .await
        .expect("Failed to store chain head");
}

/// Store every epoch of the given days with a fixed validator count
pub async fn seed_days(db: &Database, days: std::ops::Range<u64>, validators_count: i64) {
    for epoch in head_of_day(days.start)..head_of_day(days.end) {
        db.store_epoch(&epoch_record(epoch, validators_count))
            .await
            .expect("Failed to seed epoch");
    }
}

/// Mark a day complete directly, as a successful writer would
pub async fn mark_complete(db: &Database, kind: DatasetKind, day: u64) {
    let mut conn = db.pool().acquire().await.expect("Failed to acquire connection");
    Database::mark_day_complete(&mut *conn, kind, day)
        .await
        .expect("Failed to mark day complete");
}

pub async fn add_pool_member(db: &Database, validator_index: i64, pool: &str, balance: i64, active: bool) {
    db.store_validator_pool(&ValidatorPoolRecord {
        validator_index,
        pool: pool.to_string(),
        balance,
        active,
    })
    .await
    .expect("Failed to store pool member");
}

/// Every distinct status value stored in a ledger table
pub async fn distinct_ledger_states(db: &Database, kind: DatasetKind) -> Vec<bool> {
    let sql = format!(
        "SELECT DISTINCT status FROM {} ORDER BY status",
        kind.status_table()
    );
    sqlx::query_scalar(&sql)
        .fetch_all(db.pool())
        .await
        .expect("Failed to read ledger states")
}
