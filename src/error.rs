//! Error types for the sampler core.

use thiserror::Error;

/// Boxed driver error. The core never inspects it beyond `Display`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias
pub type Result<T> = std::result::Result<T, PingError>;

#[derive(Error, Debug)]
pub enum PingError {
    /// Opening (or re-opening) a session failed: transport, TLS or auth.
    #[error("failed to connect to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: BoxError,
    },

    /// A timed or probing query failed outright (not a value mismatch).
    #[error("query `{sql}` failed: {source}")]
    Query {
        sql: String,
        #[source]
        source: BoxError,
    },

    /// Mean and stddev are undefined over an empty series.
    #[error("sample count must be at least 1")]
    InvalidSampleCount,
}

impl PingError {
    pub(crate) fn query(sql: impl Into<String>, source: BoxError) -> Self {
        PingError::Query {
            sql: sql.into(),
            source,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, PingError::Connection { .. })
    }
}
