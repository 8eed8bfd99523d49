use crate::api::{ApiServer, AppState};
use crate::cli::ServeArgs;
use crate::config::Config;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Builds the effective configuration: defaults, then file, then environment, then flags.
pub fn load_config(args: &ServeArgs) -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    let mut config = Config::load(args.config.as_deref())?.with_process_env()?;

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub async fn run_service(args: &ServeArgs) -> Result<()> {
    info!("Starting meetbrief service");

    let config = load_config(args)?;
    let state = AppState::from_config(&config)?;

    if !state.summarizer.is_available() {
        warn!("Summarization requests will fail until an API key is configured");
    }

    let api_server = ApiServer::new(&config.server, state)?;
    api_server.start().await
}
