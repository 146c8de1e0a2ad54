use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use crate::config::Config;

pub const DEFAULT_CONFIG_FILE: &str = "pingperf.toml";

/// Load config from a TOML file path. Returns default config if file doesn't exist.
pub fn load_toml_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(config)
}

/// Load config from an explicit path (which must exist), else from
/// PINGPERF_CONFIG_FILE, else from ./pingperf.toml if present.
pub fn load_default_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("config file {} does not exist", path.display());
        }
        return load_toml_config(path);
    }
    let path = std::env::var("PINGPERF_CONFIG_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
    load_toml_config(&path)
}
