//! Cold vs warm database latency sampling.
//! The binary entry point lives in src/main.rs.

pub mod config;
pub mod connection;
pub mod db;
pub mod error;
pub mod report;
pub mod sampling;
#[cfg(test)]
pub mod test_helpers;

pub use connection::ConnectionHandle;
pub use error::{PingError, Result};
pub use sampling::{CombinedSummary, SampleSink, SamplingEngine, SummaryStats, TracingSink};
