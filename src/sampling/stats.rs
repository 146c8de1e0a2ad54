use serde::Serialize;

/// First and second moments of one timing series, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryStats {
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation (divides by N, not N - 1).
    pub stddev: f64,
}

/// Cold-mode result: open and query phases reduced separately.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CombinedSummary {
    pub opens: SummaryStats,
    pub queries: SummaryStats,
}

/// Per-trial timings for a single run. Max and sum are tracked as samples
/// arrive; the deviation needs the mean first, so it takes a second pass.
#[derive(Debug, Clone)]
pub struct SampleSeries {
    values: Vec<f64>,
    max: f64,
    sum: f64,
}

impl SampleSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            max: f64::NEG_INFINITY,
            sum: 0.0,
        }
    }

    pub fn push(&mut self, ms: f64) {
        self.max = self.max.max(ms);
        self.sum += ms;
        self.values.push(ms);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `None` for an empty series: mean and deviation are undefined there.
    pub fn summarize(&self) -> Option<SummaryStats> {
        if self.values.is_empty() {
            return None;
        }
        let n = self.values.len() as f64;
        let mean = self.sum / n;
        let squares: f64 = self.values.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some(SummaryStats {
            max: self.max,
            mean,
            stddev: (squares / n).sqrt(),
        })
    }
}

impl FromIterator<f64> for SampleSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut series = SampleSeries::with_capacity(iter.size_hint().0);
        for v in iter {
            series.push(v);
        }
        series
    }
}
