//! This module provides reusable test utilities:
//! - In-memory test databases with seeded epochs
//! - Recording dataset writers that can be told to fail
//! - Recording status reporters
//! - Test configuration builders
//! - Common test data

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_reporter;
pub mod mock_writer;
pub mod test_config;
pub mod test_data;
pub mod test_database;

// Re-export commonly used items
pub use mock_reporter::{FailingReporter, RecordingReporter};
pub use mock_writer::RecordingWriter;
pub use test_config::TestConfigBuilder;
pub use test_data::*;
pub use test_database::*;
