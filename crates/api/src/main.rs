//! Air Quality Anomaly Server - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, telemetry, Settings};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    init_logging(&settings.log).context("Failed to set tracing subscriber")?;

    info!("=== AQI Anomaly Engine v{} ===", env!("CARGO_PKG_VERSION"));

    let metrics = match telemetry::install_recorder() {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!(%err, "Prometheus recorder unavailable, /metrics disabled");
            None
        }
    };

    run_server(settings, metrics)
        .await
        .context("Server stopped")?;

    Ok(())
}
