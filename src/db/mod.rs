//! Driver seam: the connection factory and the live session it yields.
//!
//! The sampler only needs two query shapes from the server, a fixed scalar
//! probe and `SELECT <i>`, so any backend that can answer literal scalar
//! selects can sit behind these traits.

use async_trait::async_trait;

use crate::error::BoxError;

pub mod postgres;
pub mod target;

pub use target::{ConnectionParams, SslSettings, TargetDatabase, DEFAULT_SSL_ROOT_CERT};

/// One open, authenticated session. Exactly one owner at a time.
#[async_trait]
pub trait Session: Send {
    /// Run `sql` and decode the first column of the first row as an integer.
    async fn query_scalar(&mut self, sql: &str) -> Result<i64, BoxError>;

    /// Run `sql` and decode the first column of the first row as text.
    async fn query_text(&mut self, sql: &str) -> Result<String, BoxError>;

    /// Best-effort close. Callers may ignore the error.
    async fn close(self) -> Result<(), BoxError>;
}

/// Opens fresh sessions. Must not retry: the handle owns the retry policy.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: Session;

    async fn connect(&self, params: &ConnectionParams) -> Result<Self::Session, BoxError>;
}
