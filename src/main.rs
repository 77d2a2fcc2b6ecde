//! Covidash - COVID-19 CSV Data Dashboard & Interactive Chart Server
//!
//! Downloads the US-states time series once at startup and serves the
//! dropdown-filtered cases/deaths dashboard.

use anyhow::{Context, Result};
use covidash::data::{DataLoader, DATA_URL};
use covidash::web::{self, ServerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = parse_args()?;

    tracing::info!(url = DATA_URL, "downloading COVID-19 dataset");
    let data = DataLoader::fetch(DATA_URL)
        .await
        .context("startup dataset load failed")?;
    tracing::info!(
        rows = data.row_count(),
        states = data.states().len(),
        "dataset loaded"
    );

    web::serve(Arc::new(data), config).await
}

/// `--port <u16>` is the only flag; everything else is fixed.
fn parse_args() -> Result<ServerConfig> {
    let mut config = ServerConfig::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--port" => {
                let value = args.next().context("--port requires a value")?;
                config.port = value
                    .parse()
                    .with_context(|| format!("invalid port '{value}'"))?;
            }
            other => anyhow::bail!("unknown argument '{other}' (only --port is supported)"),
        }
    }

    Ok(config)
}
