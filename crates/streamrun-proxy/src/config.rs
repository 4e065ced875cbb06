// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for streamrun-proxy.

use std::net::SocketAddr;

use streamrun_sdk::SdkConfig;

/// Placeholder configuration id. Never a real pipeline.
pub const PLACEHOLDER_CONFIGURATION_ID: &str = "dummy-configuration-id";

/// Proxy configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub http_addr: SocketAddr,
    /// Upstream configuration whose instances are managed
    pub configuration_id: String,
    /// Upstream client settings (base URL, token, timeouts)
    pub sdk: SdkConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = std::env::var("STREAMRUN_PROXY_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let http_addr = SocketAddr::from(([0, 0, 0, 0], port));

        let configuration_id = std::env::var("STREAMRUN_CONFIGURATION_ID")
            .unwrap_or_else(|_| PLACEHOLDER_CONFIGURATION_ID.to_string());

        let sdk = SdkConfig::from_env().map_err(|e| ConfigError::Upstream(e.to_string()))?;

        Ok(Self {
            http_addr,
            configuration_id,
            sdk,
        })
    }

    /// Whether any upstream setting is still a built-in placeholder.
    pub fn uses_placeholders(&self) -> bool {
        self.sdk.uses_placeholder_key() || self.configuration_id == PLACEHOLDER_CONFIGURATION_ID
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The port number is invalid.
    #[error("Invalid port number")]
    InvalidPort,
    /// Upstream client settings are invalid.
    #[error("Invalid upstream settings: {0}")]
    Upstream(String),
}
