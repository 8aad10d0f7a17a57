mod bootstrap;

use anyhow::Result;
use traty_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use traty_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    tracing::info!("traty-server started; polling for updates");

    tokio::select! {
        result = app.runner.start() => {
            result?;
            tracing::info!("update stream ended; traty-server stopping");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received; traty-server stopping");
        }
    }

    Ok(())
}
