//! Custom error types for the statistics exporter
//!
//! Only the fatal categories get structured variants: configuration problems
//! and ledger reset failures abort the process, so callers need to be able to
//! tell them apart. Per-day writer failures stay `anyhow::Error` and are
//! absorbed by the loops.

use std::fmt;

/// Configuration error variants
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },

    /// Configuration parsing error
    ParseError { reason: String },

    /// Malformed `first-last` day range argument
    InvalidDayRange { input: String, reason: String },
}

/// Database error variants
#[derive(Debug)]
pub enum DatabaseError {
    /// Connection failed
    ConnectionFailed { reason: String },

    /// Query execution failed
    QueryFailed { query: String, reason: String },
}

/// Backfill error variants
#[derive(Debug)]
pub enum BackfillError {
    /// Deleting the ledger entry ahead of a recomputation failed
    LedgerResetFailed {
        kind: String,
        day: u64,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
            ConfigError::InvalidDayRange { input, reason } => {
                write!(f, "Invalid day range '{}': {}", input, reason)
            }
        }
    }
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::ConnectionFailed { reason } => {
                write!(f, "Database connection failed: {}", reason)
            }
            DatabaseError::QueryFailed { query, reason } => {
                write!(f, "Query '{}' failed: {}", query, reason)
            }
        }
    }
}

impl fmt::Display for BackfillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackfillError::LedgerResetFailed { kind, day, reason } => {
                write!(
                    f,
                    "Failed to reset {} status for day {}: {}",
                    kind, day, reason
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for DatabaseError {}
impl std::error::Error for BackfillError {}
