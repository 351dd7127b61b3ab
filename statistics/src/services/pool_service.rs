use crate::database::Database;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Rebuilds the pool metadata snapshot. Returns the number of pools written.
#[async_trait]
pub trait PoolRefresher: Send + Sync {
    async fn refresh(&self) -> Result<u64>;
}

pub struct PoolInfoUpdater {
    database: Arc<Database>,
}

impl PoolInfoUpdater {
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl PoolRefresher for PoolInfoUpdater {
    async fn refresh(&self) -> Result<u64> {
        self.database.refresh_pool_info().await
    }
}
