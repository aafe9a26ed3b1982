//! ETF/future market maker - Entry Point

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// ETF/future market maker
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ETFMM_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries order commands.
    etfmm_telemetry::init_logging()?;

    info!("Starting etfmm v{}", env!("CARGO_PKG_VERSION"));

    // Determine config path: CLI arg > ETFMM_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("ETFMM_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");

    let config = etfmm_bot::AppConfig::load(&config_path)?;
    info!(
        mode = %config.quoter.pricing_mode,
        max_inventory = config.quoter.max_inventory,
        "Configuration loaded"
    );

    let app = etfmm_bot::Application::new(config)?;
    app.run().await?;

    Ok(())
}
