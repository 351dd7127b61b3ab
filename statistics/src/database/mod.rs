//! Database layer for the statistics exporter.
//!
//! This module provides SQLite persistence for:
//! - The per-dataset status ledgers (`validator_stats_status`, `chart_series_status`)
//! - Derived day-indexed datasets (`validator_stats`, `chart_series`)
//! - The pool metadata snapshot (`pool_info`)
//! - Liveness rows written by the status reporter (`service_status`)
//!
//! The `epochs` and `validator_pools` tables belong to the chain indexer; they
//! are created when missing so the exporter can start against an empty store.
//!
//! The module is organized into submodules:
//! - `records` - All record types (entities)
//! - `ledger` - Status ledger reads, resets and completion marks
//! - `epochs` - Chain head and epoch rows
//! - `pools` - Pool membership and the pool metadata snapshot
//! - `status` - Service status rows

mod epochs;
mod ledger;
mod pools;
mod records;
mod status;

pub use records::*;

use anyhow::{anyhow, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

use crate::errors::DatabaseError;

const MEMORY_DATABASE: &str = ":memory:";

const SCHEMA: &[(&str, &str)] = &[
    (
        "epochs table",
        r#"
        CREATE TABLE IF NOT EXISTS epochs (
            epoch INTEGER PRIMARY KEY,
            validators_count INTEGER NOT NULL,
            eligible_ether INTEGER NOT NULL,
            voted_ether INTEGER NOT NULL,
            finalized BOOLEAN NOT NULL DEFAULT 0
        )
        "#,
    ),
    (
        "validator_pools table",
        r#"
        CREATE TABLE IF NOT EXISTS validator_pools (
            validator_index INTEGER PRIMARY KEY,
            pool TEXT NOT NULL,
            balance INTEGER NOT NULL DEFAULT 0,
            active BOOLEAN NOT NULL DEFAULT 1
        )
        "#,
    ),
    (
        "validator_pools index",
        "CREATE INDEX IF NOT EXISTS idx_validator_pools_pool ON validator_pools(pool)",
    ),
    (
        "validator_stats_status table",
        r#"
        CREATE TABLE IF NOT EXISTS validator_stats_status (
            day INTEGER PRIMARY KEY,
            status BOOLEAN NOT NULL
        )
        "#,
    ),
    (
        "chart_series_status table",
        r#"
        CREATE TABLE IF NOT EXISTS chart_series_status (
            day INTEGER PRIMARY KEY,
            status BOOLEAN NOT NULL
        )
        "#,
    ),
    (
        "validator_stats table",
        r#"
        CREATE TABLE IF NOT EXISTS validator_stats (
            day INTEGER PRIMARY KEY,
            epochs_indexed INTEGER NOT NULL,
            min_validators INTEGER NOT NULL,
            max_validators INTEGER NOT NULL,
            avg_validators REAL NOT NULL,
            participation_rate REAL NOT NULL
        )
        "#,
    ),
    (
        "chart_series table",
        r#"
        CREATE TABLE IF NOT EXISTS chart_series (
            day INTEGER NOT NULL,
            indicator TEXT NOT NULL,
            value REAL NOT NULL,
            PRIMARY KEY (day, indicator)
        )
        "#,
    ),
    (
        "pool_info table",
        r#"
        CREATE TABLE IF NOT EXISTS pool_info (
            pool TEXT PRIMARY KEY,
            validators INTEGER NOT NULL,
            active_validators INTEGER NOT NULL,
            total_balance INTEGER NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    ),
    (
        "service_status table",
        r#"
        CREATE TABLE IF NOT EXISTS service_status (
            name TEXT NOT NULL,
            instance_id TEXT NOT NULL,
            executable TEXT NOT NULL,
            version TEXT NOT NULL,
            pid INTEGER NOT NULL,
            status TEXT NOT NULL,
            metadata TEXT,
            last_update DATETIME NOT NULL,
            PRIMARY KEY (name, instance_id)
        )
        "#,
    ),
];

pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Expose pool for writers and integration test queries
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn new(database_path: &str) -> Result<Self> {
        info!("=== Starting database initialization ===");
        info!("Database path: {}", database_path);

        let in_memory = database_path == MEMORY_DATABASE;

        if !in_memory {
            if let Some(parent) = Path::new(database_path).parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = tokio::fs::create_dir_all(parent).await {
                        error!("FAILED to create parent directory {:?}: {}", parent, e);
                        return Err(e.into());
                    }
                }
            }
        }

        let database_url = if in_memory {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", database_path)
        };

        let mut options = SqliteConnectOptions::from_str(&database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(30));
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // Every connection to `:memory:` is its own database, so keep exactly one alive.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = match pool_options.connect_with(options).await {
            Ok(pool) => {
                info!("Successfully connected to SQLite database");
                pool
            }
            Err(e) => {
                error!("FAILED to connect to database: {}", e);
                error!("   Connection URL: {}", database_url);
                return Err(DatabaseError::ConnectionFailed {
                    reason: e.to_string(),
                }
                .into());
            }
        };

        let database = Self { pool };
        database.initialize_tables().await?;

        info!("=== Database initialization completed successfully ===");
        Ok(database)
    }

    async fn initialize_tables(&self) -> Result<()> {
        for (step, (name, sql)) in SCHEMA.iter().enumerate() {
            info!("Step {}: Creating {}...", step + 1, name);
            if let Err(e) = sqlx::query(sql).execute(&self.pool).await {
                error!("FAILED to create {}: {}", name, e);
                return Err(DatabaseError::QueryFailed {
                    query: name.to_string(),
                    reason: e.to_string(),
                }
                .into());
            }
        }

        info!("All database tables and indexes created successfully");
        Ok(())
    }

    /// Release all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }
}

/// SQLite stores integers as i64.
pub(crate) fn to_sql_int(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {} does not fit in an SQLite integer", value))
}

pub(crate) fn from_sql_int(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("unexpected negative value {} in database", value))
}
