//! A single live database session plus the bookkeeping needed to time how
//! long it took to open.
//!
//! Recovery policy is one reconnect, no backoff: `renew` probes the session
//! and, if the probe fails, closes it and opens exactly one replacement. A
//! failed replacement is returned to the caller.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::db::{ConnectionParams, Connector, Session};
use crate::error::{PingError, Result};

/// Liveness probe and the only value it may return.
pub const PROBE_SQL: &str = "SELECT 1";
const PROBE_EXPECTED: i64 = 1;

const VERSION_SQL: &str = "SELECT version()";

enum HandleState<S> {
    Connected(S),
    Closed,
}

/// Where `renew` stands. `Reconnecting` is entered on any probe failure and
/// left by exactly one open attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewState {
    Connected,
    Reconnecting,
}

pub struct ConnectionHandle<C: Connector> {
    connector: C,
    params: ConnectionParams,
    state: HandleState<C::Session>,
    last_open_duration: Duration,
}

impl<C: Connector> ConnectionHandle<C> {
    /// Open the first session. Fails without retrying.
    pub async fn open(connector: C, params: ConnectionParams) -> Result<Self> {
        let (session, elapsed) = open_session(&connector, &params).await?;
        Ok(Self {
            connector,
            params,
            state: HandleState::Connected(session),
            last_open_duration: elapsed,
        })
    }

    /// Time taken by the most recent successful open.
    pub fn last_open_duration(&self) -> Duration {
        self.last_open_duration
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, HandleState::Connected(_))
    }

    /// Probe the session and reopen it once if the probe fails.
    pub async fn renew(&mut self) -> Result<()> {
        let mut state = self.probe().await;
        loop {
            match state {
                RenewState::Connected => return Ok(()),
                RenewState::Reconnecting => {
                    self.close().await;
                    let (session, elapsed) = open_session(&self.connector, &self.params).await?;
                    self.state = HandleState::Connected(session);
                    self.last_open_duration = elapsed;
                    state = RenewState::Connected;
                }
            }
        }
    }

    async fn probe(&mut self) -> RenewState {
        let session = match &mut self.state {
            HandleState::Connected(session) => session,
            HandleState::Closed => return RenewState::Reconnecting,
        };
        match session.query_scalar(PROBE_SQL).await {
            Ok(PROBE_EXPECTED) => RenewState::Connected,
            Ok(other) => {
                debug!(value = other, "Liveness probe returned an unexpected value");
                RenewState::Reconnecting
            }
            Err(e) => {
                debug!(error = %e, "Liveness probe failed");
                RenewState::Reconnecting
            }
        }
    }

    /// Close the current session, ignoring errors. No-op when already closed.
    pub async fn close(&mut self) {
        if let HandleState::Connected(session) =
            std::mem::replace(&mut self.state, HandleState::Closed)
        {
            if let Err(e) = session.close().await {
                debug!(error = %e, "Ignoring error while closing session");
            }
        }
    }

    /// Run an integer-valued query on the open session.
    pub async fn query_scalar(&mut self, sql: &str) -> Result<i64> {
        let session = self.session_mut(sql)?;
        session
            .query_scalar(sql)
            .await
            .map_err(|e| PingError::query(sql, e))
    }

    /// Server version banner, e.g. "PostgreSQL 9.6.18 on x86_64-pc-linux-gnu, ...".
    pub async fn server_version(&mut self) -> Result<String> {
        let session = self.session_mut(VERSION_SQL)?;
        session
            .query_text(VERSION_SQL)
            .await
            .map_err(|e| PingError::query(VERSION_SQL, e))
    }

    fn session_mut(&mut self, sql: &str) -> Result<&mut C::Session> {
        match &mut self.state {
            HandleState::Connected(session) => Ok(session),
            HandleState::Closed => Err(PingError::query(sql, "session is closed".into())),
        }
    }
}

async fn open_session<C: Connector>(
    connector: &C,
    params: &ConnectionParams,
) -> Result<(C::Session, Duration)> {
    let start = Instant::now();
    match connector.connect(params).await {
        Ok(session) => Ok((session, start.elapsed())),
        Err(e) => {
            warn!(target_url = %params.url(), error = %e, "Failed to connect to the database");
            Err(PingError::Connection {
                target: params.url(),
                source: e,
            })
        }
    }
}
