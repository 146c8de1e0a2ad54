use anyhow::Result;
use crate::config::Config;
use crate::config::cli::Cli;
use crate::config::toml_config::load_default_config;
use crate::config::env_config::load_env_config;

/// Load the final merged config:
/// 1. Load dotenv if .env exists
/// 2. Load TOML base config
/// 3. Load env var overrides
/// 4. Apply command-line flags last
///
/// The result is not validated; callers run `Config::validate` once logging is up.
pub fn load_config(cli: &Cli) -> Result<Config> {
    // 1. Load .env if present
    if std::path::Path::new(".env").exists() {
        dotenv::dotenv().ok();
    }

    // 2. TOML base
    let base = load_default_config(cli.config.as_deref())?;

    // 3. Env overrides
    let env = load_env_config();
    let config = env.apply_to(base);

    // 4. CLI
    Ok(cli.apply_to(config))
}
