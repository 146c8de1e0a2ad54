//! End-of-run summary, rendered as log lines or JSON.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::sampling::{CombinedSummary, SummaryStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub samples: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
    pub cold: CombinedSummary,
    pub warm: SummaryStats,
}

fn stats_line(label: &str, s: &SummaryStats) -> String {
    format!(
        "{label}: max: {:.2} ms mean: {:.2} ms stddev: {:.2}",
        s.max, s.mean, s.stddev
    )
}

impl RunReport {
    /// One line per phase: cold opens, cold queries, warm queries.
    pub fn text_lines(&self) -> Vec<String> {
        vec![
            stats_line("Open perf", &self.cold.opens),
            stats_line("Cold run queries", &self.cold.queries),
            stats_line("Warm run queries", &self.warm),
        ]
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
