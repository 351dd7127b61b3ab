// File: statistics/src/services/mod.rs

pub mod pool_service;
pub mod status_service;

pub use pool_service::{PoolInfoUpdater, PoolRefresher};
pub use status_service::{
    DatabaseStatusReporter, ServiceIdentity, StatusReport, StatusReporter, StatusService,
    WebhookStatusReporter,
};
