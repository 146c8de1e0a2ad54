//! Cold and warm latency sampling.
//!
//! Both modes run the same per-trial query (`SELECT <i>`), validate it the
//! same way and reduce through the same [`SampleSeries`], so their numbers
//! are directly comparable. They differ only in whether the session is torn
//! down and rebuilt around every trial.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::connection::ConnectionHandle;
use crate::db::Connector;
use crate::error::{PingError, Result};

pub mod sink;
pub mod stats;

pub use sink::{SampleSink, TracingSink};
pub use stats::{CombinedSummary, SampleSeries, SummaryStats};

/// Primes the driver before warm timing; its latency is never recorded.
pub const WARMUP_SQL: &str = "SELECT 101010";

fn trial_sql(index: u32) -> String {
    format!("SELECT {index}")
}

fn as_millis_f64(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

fn summarize(series: &SampleSeries) -> Result<SummaryStats> {
    series.summarize().ok_or(PingError::InvalidSampleCount)
}

pub struct SamplingEngine<K> {
    sink: K,
}

impl<K: SampleSink> SamplingEngine<K> {
    pub fn new(sink: K) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Time `sample_count` queries on one session that stays open throughout.
    pub async fn run_warm<C: Connector>(
        &mut self,
        handle: &mut ConnectionHandle<C>,
        sample_count: u32,
    ) -> Result<SummaryStats> {
        if sample_count == 0 {
            return Err(PingError::InvalidSampleCount);
        }

        let warmup = handle.query_scalar(WARMUP_SQL).await?;
        debug!(value = warmup, "Warm-up query done");

        let mut calls = SampleSeries::with_capacity(sample_count as usize);
        for index in 0..sample_count {
            let call_ms = self.timed_trial(handle, index).await?;
            calls.push(call_ms);
            self.sink.warm_sample(index, call_ms);
        }

        summarize(&calls)
    }

    /// Time `sample_count` fresh opens, each followed by one query.
    ///
    /// Open and query are timed as disjoint phases; the per-trial close is in
    /// neither.
    pub async fn run_cold<C: Connector>(
        &mut self,
        handle: &mut ConnectionHandle<C>,
        sample_count: u32,
    ) -> Result<CombinedSummary> {
        if sample_count == 0 {
            return Err(PingError::InvalidSampleCount);
        }

        handle.close().await;

        let mut opens = SampleSeries::with_capacity(sample_count as usize);
        let mut calls = SampleSeries::with_capacity(sample_count as usize);
        for index in 0..sample_count {
            handle.renew().await?;
            let open_ms = as_millis_f64(handle.last_open_duration());
            let call_ms = self.timed_trial(handle, index).await?;
            // Untimed: call times here exclude the cost of a close.
            handle.close().await;

            opens.push(open_ms);
            calls.push(call_ms);
            self.sink.cold_sample(index, open_ms, call_ms);
        }

        Ok(CombinedSummary {
            opens: summarize(&opens)?,
            queries: summarize(&calls)?,
        })
    }

    /// One validated round-trip. A wrong value is reported, never fatal, and
    /// the timing still counts.
    async fn timed_trial<C: Connector>(
        &mut self,
        handle: &mut ConnectionHandle<C>,
        index: u32,
    ) -> Result<f64> {
        let sql = trial_sql(index);
        let start = Instant::now();
        let value = handle.query_scalar(&sql).await?;
        let elapsed = start.elapsed();

        let expected = i64::from(index);
        if value != expected {
            self.sink.mismatch(expected, value);
        }
        Ok(as_millis_f64(elapsed))
    }
}
