// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the streamrun client.

use std::time::Duration;

use crate::error::{Result, SdkError};

/// Public API root used when `STREAMRUN_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://streamrun.com/api/v1";

/// Placeholder token. Never a real credential; requests made with it are rejected upstream.
pub const PLACEHOLDER_API_KEY: &str = "dummy-api-key";

/// Configuration for the StreamrunClient.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// API root, without trailing slash.
    pub base_url: String,
    /// Bearer token sent on every request.
    pub api_key: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: PLACEHOLDER_API_KEY.to_string(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl SdkConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STREAMRUN_BASE_URL`: API root (default: "https://streamrun.com/api/v1")
    /// - `STREAMRUN_API_KEY`: Bearer token (default: a dummy placeholder)
    /// - `STREAMRUN_REQUEST_TIMEOUT_MS`: Request timeout in milliseconds (default: 10000)
    /// - `STREAMRUN_CONNECT_TIMEOUT_MS`: Connection timeout in milliseconds (default: 5000)
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("STREAMRUN_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let api_key =
            std::env::var("STREAMRUN_API_KEY").unwrap_or_else(|_| PLACEHOLDER_API_KEY.to_string());

        let request_timeout_ms: u64 = std::env::var("STREAMRUN_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .map_err(|e| {
                SdkError::Config(format!("invalid STREAMRUN_REQUEST_TIMEOUT_MS: {}", e))
            })?;

        let connect_timeout_ms: u64 = std::env::var("STREAMRUN_CONNECT_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|e| {
                SdkError::Config(format!("invalid STREAMRUN_CONNECT_TIMEOUT_MS: {}", e))
            })?;

        Ok(Self::new()
            .with_base_url(base_url)
            .with_api_key(api_key)
            .with_request_timeout(Duration::from_millis(request_timeout_ms))
            .with_connect_timeout(Duration::from_millis(connect_timeout_ms)))
    }

    /// Set the API root. A trailing slash is stripped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Whether the token is still the built-in placeholder.
    pub fn uses_placeholder_key(&self) -> bool {
        self.api_key == PLACEHOLDER_API_KEY
    }
}
