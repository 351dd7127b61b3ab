//! Tests for the status ledger queries

mod common;

use common::fixtures::*;
use statistics::{DatasetKind, DayStatus};

#[tokio::test]
async fn test_empty_ledger() {
    let db = test_database().await;

    for kind in DatasetKind::ALL {
        assert_eq!(db.last_completed_day(kind).await.unwrap(), None);
        assert_eq!(db.day_status(kind, 0).await.unwrap(), DayStatus::Absent);
        assert!(db.completed_days(kind).await.unwrap().is_empty());
        assert!(db.missing_days(kind).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_last_completed_day_is_the_maximum() {
    let db = test_database().await;
    for day in [4, 0, 2] {
        mark_complete(&db, DatasetKind::ValidatorStatistics, day).await;
    }

    assert_eq!(
        db.last_completed_day(DatasetKind::ValidatorStatistics).await.unwrap(),
        Some(4)
    );
    assert_eq!(
        db.completed_days(DatasetKind::ValidatorStatistics).await.unwrap(),
        vec![0, 2, 4]
    );
    assert_eq!(
        db.missing_days(DatasetKind::ValidatorStatistics).await.unwrap(),
        vec![1, 3]
    );
}

#[tokio::test]
async fn test_ledgers_are_per_kind() {
    let db = test_database().await;
    mark_complete(&db, DatasetKind::ChartSeries, 7).await;

    assert_eq!(
        db.last_completed_day(DatasetKind::ChartSeries).await.unwrap(),
        Some(7)
    );
    assert_eq!(
        db.last_completed_day(DatasetKind::ValidatorStatistics).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_marking_twice_keeps_one_row() {
    let db = test_database().await;
    mark_complete(&db, DatasetKind::ChartSeries, 3).await;
    mark_complete(&db, DatasetKind::ChartSeries, 3).await;

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chart_series_status")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_reset_day_removes_only_that_entry() {
    let db = test_database().await;
    for day in 0..3 {
        mark_complete(&db, DatasetKind::ValidatorStatistics, day).await;
    }
    mark_complete(&db, DatasetKind::ChartSeries, 1).await;

    let removed = db
        .reset_day(DatasetKind::ValidatorStatistics, 1)
        .await
        .unwrap();
    assert_eq!(removed, 1);

    assert_eq!(
        db.completed_days(DatasetKind::ValidatorStatistics).await.unwrap(),
        vec![0, 2]
    );
    assert_eq!(
        db.day_status(DatasetKind::ChartSeries, 1).await.unwrap(),
        DayStatus::Complete
    );

    // Resetting an absent day is not an error
    let removed = db
        .reset_day(DatasetKind::ValidatorStatistics, 9)
        .await
        .unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn test_false_status_row_reads_as_absent() {
    let db = test_database().await;
    sqlx::query("INSERT INTO validator_stats_status (day, status) VALUES (5, 0)")
        .execute(db.pool())
        .await
        .unwrap();

    assert_eq!(
        db.day_status(DatasetKind::ValidatorStatistics, 5).await.unwrap(),
        DayStatus::Absent
    );
    assert_eq!(
        db.last_completed_day(DatasetKind::ValidatorStatistics).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_latest_epoch() {
    let db = test_database().await;
    assert_eq!(db.latest_epoch().await.unwrap(), None);

    set_chain_head(&db, 500).await;
    set_chain_head(&db, 20).await;
    assert_eq!(db.latest_epoch().await.unwrap(), Some(500));
}

#[tokio::test]
async fn test_file_database_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/data/explorer.db");

    let db = statistics::Database::new(path.to_str().unwrap()).await.unwrap();
    mark_complete(&db, DatasetKind::ChartSeries, 0).await;
    db.close().await;

    assert!(path.exists());
}
