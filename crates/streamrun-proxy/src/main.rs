// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Streamrun Proxy - chat-bot and dashboard front for the streamrun API.

use std::sync::Arc;
use tracing::{info, warn};

use streamrun_proxy::config::Config;
use streamrun_proxy::handlers::ProxyHandlerState;
use streamrun_proxy::server;
use streamrun_sdk::StreamrunClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "streamrun_proxy=info,streamrun_sdk=info,tower_http=info".into()
            }),
        )
        .init();

    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        warn!("No .env file loaded: {}", e);
    }

    let config = Config::from_env()?;

    info!(
        http_addr = %config.http_addr,
        base_url = %config.sdk.base_url,
        configuration_id = %config.configuration_id,
        "Starting Streamrun Proxy"
    );
    if config.uses_placeholders() {
        warn!("STREAMRUN_API_KEY or STREAMRUN_CONFIGURATION_ID not set, upstream calls will be rejected");
    }

    let client = StreamrunClient::new(config.sdk.clone())?;
    let state = Arc::new(ProxyHandlerState::new(
        Arc::new(client),
        config.configuration_id.clone(),
    ));

    // A missing catalog only disables input switching until the next refresh
    if let Err(e) = state.catalog.refresh().await {
        warn!(error = %e, "Initial element catalog refresh failed");
    }

    server::serve(config.http_addr, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
    })
    .await?;

    info!("Streamrun Proxy shut down");

    Ok(())
}
