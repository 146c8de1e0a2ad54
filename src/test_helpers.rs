//! In-memory connector and sink used by the unit tests.
//!
//! Latencies are produced with `tokio::time::sleep`, so tests run under
//! `#[tokio::test(start_paused = true)]` and observe exact synthetic timings.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::connection::PROBE_SQL;
use crate::db::{ConnectionParams, Connector, Session, TargetDatabase};
use crate::error::BoxError;
use crate::sampling::SampleSink;

pub fn test_params() -> ConnectionParams {
    ConnectionParams {
        host: "db.test".to_string(),
        port: "5432".to_string(),
        username: "stats".to_string(),
        password: "secret".to_string(),
        target: TargetDatabase::Workgroup,
        ssl: None,
    }
}

/// What the fake backend saw, tagged with the session id (the open attempt
/// number that created it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open(usize),
    OpenFailed(usize),
    Probe(usize),
    Query(usize, i64),
    Close(usize),
}

#[derive(Default)]
struct FakeState {
    open_latency_ms: u64,
    close_latency_ms: u64,
    default_query_latency_ms: u64,
    query_latency_ms: HashMap<i64, u64>,
    wrong_answers: HashMap<i64, i64>,
    failing_queries: HashSet<i64>,
    failing_opens: HashSet<usize>,
    fail_closes: bool,
    fail_next_probe: bool,
    corrupt_next_probe: Option<i64>,
    open_attempts: usize,
    events: Vec<Event>,
}

#[derive(Clone, Default)]
pub struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_open_latency_ms(self, ms: u64) -> Self {
        self.set_open_latency_ms(ms);
        self
    }

    pub fn set_open_latency_ms(&self, ms: u64) {
        self.state.lock().unwrap().open_latency_ms = ms;
    }

    pub fn with_close_latency_ms(self, ms: u64) -> Self {
        self.state.lock().unwrap().close_latency_ms = ms;
        self
    }

    /// Same latency for every query that has no specific latency.
    pub fn with_query_latency_ms(self, ms: u64) -> Self {
        self.state.lock().unwrap().default_query_latency_ms = ms;
        self
    }

    /// Latency of `SELECT i` for i = 0, 1, 2, ...
    pub fn with_query_latencies_ms(self, latencies: impl IntoIterator<Item = u64>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for (i, ms) in latencies.into_iter().enumerate() {
                state.query_latency_ms.insert(i as i64, ms);
            }
        }
        self
    }

    /// Latency of the query whose literal is `value`.
    pub fn with_latency_for(self, value: i64, ms: u64) -> Self {
        self.state.lock().unwrap().query_latency_ms.insert(value, ms);
        self
    }

    /// `SELECT index` returns `actual` instead of `index`.
    pub fn with_wrong_answer(self, index: i64, actual: i64) -> Self {
        self.state.lock().unwrap().wrong_answers.insert(index, actual);
        self
    }

    pub fn fail_query(self, index: i64) -> Self {
        self.state.lock().unwrap().failing_queries.insert(index);
        self
    }

    /// Open attempts (0-based) that should fail.
    pub fn fail_opens(self, attempts: impl IntoIterator<Item = usize>) -> Self {
        self.state.lock().unwrap().failing_opens.extend(attempts);
        self
    }

    pub fn fail_closes(self) -> Self {
        self.state.lock().unwrap().fail_closes = true;
        self
    }

    pub fn fail_next_probe(&self) {
        self.state.lock().unwrap().fail_next_probe = true;
    }

    pub fn corrupt_next_probe(&self, value: i64) {
        self.state.lock().unwrap().corrupt_next_probe = Some(value);
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.state.lock().unwrap().events.iter().filter(|e| pred(e)).count()
    }

    /// Open attempts, successful or not.
    pub fn opens(&self) -> usize {
        self.count(|e| matches!(e, Event::Open(_) | Event::OpenFailed(_)))
    }

    pub fn closes(&self) -> usize {
        self.count(|e| matches!(e, Event::Close(_)))
    }

    pub fn probes(&self) -> usize {
        self.count(|e| matches!(e, Event::Probe(_)))
    }

    /// Literals queried through `query_scalar`, probes excluded.
    pub fn queried_values(&self) -> Vec<i64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Query(_, v) => Some(v),
                _ => None,
            })
            .collect()
    }
}

pub struct FakeSession {
    id: usize,
    state: Arc<Mutex<FakeState>>,
}

async fn pause_ms(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Session = FakeSession;

    async fn connect(&self, _params: &ConnectionParams) -> Result<FakeSession, BoxError> {
        let (id, latency, fail) = {
            let mut state = self.state.lock().unwrap();
            let id = state.open_attempts;
            state.open_attempts += 1;
            (id, state.open_latency_ms, state.failing_opens.contains(&id))
        };
        pause_ms(latency).await;
        let mut state = self.state.lock().unwrap();
        if fail {
            state.events.push(Event::OpenFailed(id));
            return Err("connection refused".into());
        }
        state.events.push(Event::Open(id));
        Ok(FakeSession {
            id,
            state: self.state.clone(),
        })
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn query_scalar(&mut self, sql: &str) -> Result<i64, BoxError> {
        if sql == PROBE_SQL {
            let mut state = self.state.lock().unwrap();
            state.events.push(Event::Probe(self.id));
            if std::mem::take(&mut state.fail_next_probe) {
                return Err("server closed the connection unexpectedly".into());
            }
            return Ok(state.corrupt_next_probe.take().unwrap_or(1));
        }

        let value: i64 = sql
            .strip_prefix("SELECT ")
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| format!("fake backend cannot run `{sql}`"))?;
        let latency = {
            let mut state = self.state.lock().unwrap();
            state.events.push(Event::Query(self.id, value));
            state
                .query_latency_ms
                .get(&value)
                .copied()
                .unwrap_or(state.default_query_latency_ms)
        };
        pause_ms(latency).await;
        let state = self.state.lock().unwrap();
        if state.failing_queries.contains(&value) {
            return Err("connection reset by peer".into());
        }
        Ok(state.wrong_answers.get(&value).copied().unwrap_or(value))
    }

    async fn query_text(&mut self, _sql: &str) -> Result<String, BoxError> {
        Ok("PostgreSQL 16.2 (fake) on x86_64-pc-linux-gnu".to_string())
    }

    async fn close(self) -> Result<(), BoxError> {
        let latency = self.state.lock().unwrap().close_latency_ms;
        pause_ms(latency).await;
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Close(self.id));
        if state.fail_closes {
            return Err("close failed".into());
        }
        Ok(())
    }
}

/// Sink that keeps every reported line for later assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub warm: Vec<(u32, f64)>,
    pub cold: Vec<(u32, f64, f64)>,
    pub mismatches: Vec<(i64, i64)>,
}

impl SampleSink for RecordingSink {
    fn warm_sample(&mut self, index: u32, call_ms: f64) {
        self.warm.push((index, call_ms));
    }

    fn cold_sample(&mut self, index: u32, open_ms: f64, call_ms: f64) {
        self.cold.push((index, open_ms, call_ms));
    }

    fn mismatch(&mut self, expected: i64, actual: i64) {
        self.mismatches.push((expected, actual));
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
