//! Building Energy Twin - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, ApiConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::load().context("Failed to load configuration")?;
    init_logging(&config.log_level, config.log_json);

    info!("=== Building Energy Twin v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Dataset: {}, strict scenarios: {}",
        config.dataset_path.display(),
        config.strict_scenarios
    );

    run_server(config).await?;

    Ok(())
}
