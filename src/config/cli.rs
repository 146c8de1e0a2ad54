use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::Config;
use crate::db::TargetDatabase;
use crate::report::OutputFormat;

/// Command-line flags. Every field is optional so that unset flags leave the
/// TOML/env values alone. `-h` is the host, so help is `--help` only.
#[derive(Debug, Default, Parser)]
#[command(
    name = "pingperf",
    version,
    about = "Measure cold (new connection) and warm (open connection) database latency",
    disable_help_flag = true
)]
pub struct Cli {
    /// Number of samples to take
    #[arg(short = 'n', long = "numsamples", alias = "samples")]
    pub samples: Option<u32>,

    /// Database user
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Database password
    #[arg(short = 'P', long)]
    pub password: Option<String>,

    /// Database address
    #[arg(short = 'h', long)]
    pub host: Option<String>,

    /// Database port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Logical database to connect to (workgroup or relationship)
    #[arg(short = 't', long)]
    pub target: Option<TargetDatabase>,

    /// Use SSL, verifying the server against --ssl-root-cert (`--ssl=false` turns it off)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
    pub ssl: Option<bool>,

    /// PEM root certificate (default: ca-root.pem)
    #[arg(long, value_name = "PATH")]
    pub ssl_root_cert: Option<String>,

    /// TOML config file (default: $PINGPERF_CONFIG_FILE or ./pingperf.toml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Summary output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Log filter, e.g. "info" or "pingperf=debug"
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Cli {
    /// Apply flags onto a base Config. Flags win over every other layer.
    pub fn apply_to(&self, mut base: Config) -> Config {
        if let Some(v) = &self.host {
            base.connection.host = Some(v.clone());
        }
        if let Some(v) = self.port {
            base.connection.port = Some(v);
        }
        if let Some(v) = &self.user {
            base.connection.user = Some(v.clone());
        }
        if let Some(v) = &self.password {
            base.connection.password = Some(v.clone());
        }
        if let Some(v) = self.target {
            base.connection.target = v;
        }
        if let Some(v) = self.ssl {
            base.connection.ssl = v;
        }
        if let Some(v) = &self.ssl_root_cert {
            base.connection.ssl_root_cert = Some(v.clone());
        }
        if let Some(v) = self.samples {
            base.sampling.samples = v;
        }
        if let Some(v) = self.format {
            base.output.format = v;
        }
        if let Some(v) = &self.log_level {
            base.monitoring.log_level = v.clone();
        }
        base
    }
}
