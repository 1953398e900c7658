//! `cortex serve` command - Start the HTTP server

use anyhow::Result;
use cortex_core::server::{start_server, AppState};
use cortex_core::{Config, GeminiClient};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run(config: Config) -> Result<()> {
    let client = GeminiClient::new(&config.gemini.binary, &config.gemini.model)
        .with_timeout(config.gemini.timeout_secs);

    if client.check_available().await {
        info!("Gemini CLI available, model: {}", config.gemini.model);
    } else {
        warn!(
            "Gemini CLI not found at '{}'. Requests will fail until it is installed.",
            config.gemini.binary
        );
    }

    let state = Arc::new(AppState::new(client, config));
    start_server(state).await?;

    Ok(())
}
