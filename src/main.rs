use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pingperf::config::{self, cli::Cli};
use pingperf::db::postgres::PgConnector;
use pingperf::db::ConnectionParams;
use pingperf::report::{OutputFormat, RunReport};
use pingperf::{ConnectionHandle, SamplingEngine, TracingSink};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::merge::load_config(&cli)?;

    // Logs go to stderr so `--format json` output on stdout stays parseable.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.monitoring.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    config.validate()?;
    let params = config.connection_params()?;
    info!(target_url = %params.url(), user = %params.username, "Configuration loaded");

    let report = match run(params, config.sampling.samples).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = ?e, "pingperf aborted");
            return Err(e);
        }
    };

    match config.output.format {
        OutputFormat::Text => {
            for line in report.text_lines() {
                info!("{line}");
            }
        }
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}

async fn run(params: ConnectionParams, samples: u32) -> Result<RunReport> {
    let mut handle = ConnectionHandle::open(PgConnector, params).await?;

    let server_version = match handle.server_version().await {
        Ok(v) => {
            info!(version = %v, "Connected");
            Some(v)
        }
        Err(e) => {
            warn!(error = %e, "Could not read server version");
            None
        }
    };

    let mut engine = SamplingEngine::new(TracingSink);
    let result = async {
        info!("Starting timing: {samples} samples (All timing in ms)");
        info!("New connection test");
        let cold = engine.run_cold(&mut handle, samples).await?;

        info!("Warm connection test");
        handle.renew().await?;
        let warm = engine.run_warm(&mut handle, samples).await?;
        Ok::<_, pingperf::PingError>((cold, warm))
    }
    .await;

    // Release the session whether or not the run completed.
    handle.close().await;
    let (cold, warm) = result?;

    Ok(RunReport {
        samples,
        server_version,
        cold,
        warm,
    })
}
