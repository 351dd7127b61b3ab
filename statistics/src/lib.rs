pub mod cli;
pub mod config;
pub mod constants;
pub mod database;
pub mod datasets;
pub mod day_clock;
pub mod errors;
pub mod scheduler;
pub mod services;

// Re-export commonly used types
pub use config::{Config, ConfigManager};
pub use database::Database;
pub use datasets::{DatasetKind, DatasetWriter, DayStatus};
pub use day_clock::{DayClock, DayReading};
pub use scheduler::{Backfill, CatchUpDriver, DaySelection, ExporterOptions, PoolsLoop};
pub use services::StatusService;
