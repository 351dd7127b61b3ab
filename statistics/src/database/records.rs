//! Database record types (entities).
//!
//! This module contains all the record structs used by the database layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Chain index entities (owned by the indexer)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochRecord {
    pub epoch: u64,
    pub validators_count: i64,
    pub eligible_ether: i64,
    pub voted_ether: i64,
    pub finalized: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorPoolRecord {
    pub validator_index: i64,
    pub pool: String,
    pub balance: i64,
    pub active: bool,
}

// ============================================================================
// Derived entities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorStatsRecord {
    pub day: u64,
    pub epochs_indexed: i64,
    pub min_validators: i64,
    pub max_validators: i64,
    pub avg_validators: f64,
    pub participation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub day: u64,
    pub indicator: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolInfoRecord {
    pub pool: String,
    pub validators: i64,
    pub active_validators: i64,
    pub total_balance: i64,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Liveness
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatusRecord {
    pub name: String,
    pub instance_id: String,
    pub executable: String,
    pub version: String,
    pub pid: i64,
    pub status: String,
    pub metadata: Option<String>, // JSON document
    pub last_update: DateTime<Utc>,
}
