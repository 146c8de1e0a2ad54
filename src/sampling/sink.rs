use tracing::{error, info};

/// Receives per-trial results from the sampling engine.
///
/// Which numbers are reported together is fixed: a cold trial always carries
/// its open time next to its call time.
pub trait SampleSink {
    fn warm_sample(&mut self, index: u32, call_ms: f64);

    fn cold_sample(&mut self, index: u32, open_ms: f64, call_ms: f64);

    /// A trial query returned something other than its own index.
    fn mismatch(&mut self, expected: i64, actual: i64);
}

pub fn warm_line(call_ms: f64) -> String {
    format!("Call time: {call_ms:.2}")
}

pub fn cold_line(open_ms: f64, call_ms: f64) -> String {
    format!("Open time: {open_ms:.2} Call time: {call_ms:.2}")
}

pub fn mismatch_line(expected: i64, actual: i64) -> String {
    format!("Invalid result {actual} returned expected {expected}")
}

/// Emits every trial as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl SampleSink for TracingSink {
    fn warm_sample(&mut self, index: u32, call_ms: f64) {
        info!(trial = index, call_ms, "{}", warm_line(call_ms));
    }

    fn cold_sample(&mut self, index: u32, open_ms: f64, call_ms: f64) {
        info!(trial = index, open_ms, call_ms, "{}", cold_line(open_ms, call_ms));
    }

    fn mismatch(&mut self, expected: i64, actual: i64) {
        error!(expected, actual, "{}", mismatch_line(expected, actual));
    }
}
