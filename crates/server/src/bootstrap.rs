use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use traty_core::config::{AppConfig, ConfigError, LoadOptions};
use traty_core::{SessionRegistry, SinkError};
use traty_sheets::SheetsClient;
use traty_telegram::{HttpTelegramApi, LongPollRunner, ReconnectPolicy, TransportError};

pub struct Application {
    pub config: AppConfig,
    pub registry: Arc<SessionRegistry>,
    pub runner: LongPollRunner,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("sheet store unavailable at startup: {0}")]
    Sheets(#[from] SinkError),
    #[error("telegram transport setup failed: {0}")]
    Transport(#[from] TransportError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Wires the sheet sink, the session registry and the long-poll runner. An
/// unreachable spreadsheet fails the process here, before any update is
/// consumed.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!("starting application bootstrap");

    let sheets = SheetsClient::new(&config.sheets)?;
    sheets.probe().await?;
    info!(spreadsheet_id = %config.sheets.spreadsheet_id, "sheet store reachable");

    let registry = Arc::new(SessionRegistry::new(Arc::new(sheets)));

    let transport = Arc::new(HttpTelegramApi::new(&config.telegram)?);
    let runner =
        LongPollRunner::new(transport, Arc::clone(&registry), ReconnectPolicy::default());
    info!("telegram long poll transport initialized");

    Ok(Application { config, registry, runner })
}
