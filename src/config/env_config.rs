use crate::config::Config;
use crate::db::TargetDatabase;
use crate::report::OutputFormat;

// ---------------------------------------------------------------------------
// Helpers use eprintln! because this runs before the logging system starts.
// ---------------------------------------------------------------------------

fn parse_env_num<T: std::str::FromStr>(key: &str) -> Option<T> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => match v.parse::<T>() {
            Ok(n) => Some(n),
            Err(_) => {
                eprintln!(
                    "Warning: {} is set to {:?} but could not be parsed as a number; using default",
                    key, v
                );
                None
            }
        },
        _ => None,
    }
}

fn parse_bool_env(key: &str) -> Option<bool> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => match v.to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => {
                eprintln!(
                    "Warning: {} is set to {:?} but is not a recognized boolean \
                     (true/false/1/0/yes/no); using default",
                    key, v
                );
                None
            }
        },
        _ => None,
    }
}

fn parse_target_env(key: &str) -> Option<TargetDatabase> {
    let v = std::env::var(key).ok().filter(|s| !s.is_empty())?;
    match v.parse() {
        Ok(t) => Some(t),
        Err(e) => {
            eprintln!("Warning: {key}: {e}; using default");
            None
        }
    }
}

fn parse_format_env(key: &str) -> Option<OutputFormat> {
    match std::env::var(key).ok()?.to_lowercase().as_str() {
        "" => None,
        "text" => Some(OutputFormat::Text),
        "json" => Some(OutputFormat::Json),
        other => {
            eprintln!("Warning: {key} is set to {other:?}; valid values: text, json; using default");
            None
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read every PINGPERF_* override. Only sets fields whose variable is present.
pub fn load_env_config() -> EnvConfig {
    EnvConfig {
        host: non_empty_var("PINGPERF_HOST"),
        port: parse_env_num::<u16>("PINGPERF_PORT"),
        user: non_empty_var("PINGPERF_USER"),
        // An empty password is a legitimate value.
        password: std::env::var("PINGPERF_PASSWORD").ok(),
        target: parse_target_env("PINGPERF_TARGET"),
        ssl: parse_bool_env("PINGPERF_SSL"),
        ssl_root_cert: non_empty_var("PINGPERF_SSL_ROOT_CERT"),
        samples: parse_env_num::<u32>("PINGPERF_SAMPLES"),
        format: parse_format_env("PINGPERF_FORMAT"),
        log_level: non_empty_var("PINGPERF_LOG_LEVEL"),
    }
}

/// All env var overrides (None = not set, don't override).
#[derive(Debug, Default)]
pub struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub target: Option<TargetDatabase>,
    pub ssl: Option<bool>,
    pub ssl_root_cert: Option<String>,
    pub samples: Option<u32>,
    pub format: Option<OutputFormat>,
    pub log_level: Option<String>,
}

impl EnvConfig {
    /// Apply env var overrides onto a base Config, returning the merged result.
    pub fn apply_to(self, mut base: Config) -> Config {
        if let Some(v) = self.host {
            base.connection.host = Some(v);
        }
        if let Some(v) = self.port {
            base.connection.port = Some(v);
        }
        if let Some(v) = self.user {
            base.connection.user = Some(v);
        }
        if let Some(v) = self.password {
            base.connection.password = Some(v);
        }
        if let Some(v) = self.target {
            base.connection.target = v;
        }
        if let Some(v) = self.ssl {
            base.connection.ssl = v;
        }
        if let Some(v) = self.ssl_root_cert {
            base.connection.ssl_root_cert = Some(v);
        }
        if let Some(v) = self.samples {
            base.sampling.samples = v;
        }
        if let Some(v) = self.format {
            base.output.format = v;
        }
        if let Some(v) = self.log_level {
            base.monitoring.log_level = v;
        }
        base
    }
}
