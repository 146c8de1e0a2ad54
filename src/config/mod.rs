use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::db::{ConnectionParams, SslSettings, TargetDatabase, DEFAULT_SSL_ROOT_CERT};
use crate::report::OutputFormat;

pub mod cli;
pub mod env_config;
pub mod merge;
pub mod toml_config;

pub const DEFAULT_SAMPLES: u32 = 10;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub sampling: SamplingConfig,
    pub output: OutputConfig,
    pub monitoring: MonitoringConfig,
}

/// Host, port and credentials have no usable default; `validate` rejects a
/// config that leaves any of them unset.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub target: TargetDatabase,
    pub ssl: bool,
    /// PEM root certificate passed to the server connection when `ssl` is on.
    pub ssl_root_cert: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub samples: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("target", &self.target)
            .field("ssl", &self.ssl)
            .field("ssl_root_cert", &self.ssl_root_cert)
            .finish()
    }
}

fn is_blank(v: &Option<String>) -> bool {
    v.as_deref().map_or(true, |s| s.trim().is_empty())
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let conn = &self.connection;

        if is_blank(&conn.user) || conn.password.is_none() {
            anyhow::bail!(
                "A database username and password was not specified directly or via a config file \
                 (use -u/-P, PINGPERF_USER/PINGPERF_PASSWORD or [connection] in pingperf.toml)"
            );
        }

        if is_blank(&conn.host) || conn.port.is_none() {
            anyhow::bail!(
                "A database host and port was not specified directly or via a config file \
                 (use -h/-p, PINGPERF_HOST/PINGPERF_PORT or [connection] in pingperf.toml)"
            );
        }

        if conn.port == Some(0) {
            anyhow::bail!("Config error: port cannot be 0");
        }

        if self.sampling.samples == 0 {
            anyhow::bail!("Config error: number of samples must be at least 1 (got 0)");
        }

        if conn.ssl && matches!(conn.ssl_root_cert.as_deref(), Some(s) if s.trim().is_empty()) {
            anyhow::bail!("Config error: ssl_root_cert is set but empty");
        }

        Ok(())
    }

    /// Build the immutable connection parameters. Call after `validate`.
    pub fn connection_params(&self) -> anyhow::Result<ConnectionParams> {
        let conn = &self.connection;
        let ssl = conn.ssl.then(|| SslSettings {
            root_cert: conn
                .ssl_root_cert
                .clone()
                .unwrap_or_else(|| DEFAULT_SSL_ROOT_CERT.to_string()),
        });
        Ok(ConnectionParams {
            host: conn.host.clone().context("database host is not set")?,
            port: conn.port.context("database port is not set")?.to_string(),
            username: conn.user.clone().context("database user is not set")?,
            password: conn.password.clone().context("database password is not set")?,
            target: conn.target,
            ssl,
        })
    }
}
