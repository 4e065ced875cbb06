// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! StreamrunClient for interacting with the streamrun orchestration API.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::SdkConfig;
use crate::error::{Result, SdkError};
use crate::types::{
    ConfigurationDocument, CreateInstancesRequest, Destination, InstanceSummary, OutputState,
    OutputsUpdate,
};

/// Async client for the streamrun REST API.
///
/// Every call issues a single request authenticated with the configured bearer
/// token. Non-success statuses become [`SdkError::Rejected`] with the response
/// body preserved; nothing is retried.
#[derive(Clone)]
pub struct StreamrunClient {
    http: reqwest::Client,
    config: SdkConfig,
}

impl StreamrunClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SdkConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| SdkError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.config.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    /// Send a request, mapping transport failures and non-2xx statuses.
    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(rejected(response).await)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_body<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<()> {
        self.send(self.request(method, path).json(body)).await?;
        Ok(())
    }

    fn transport_error(&self, err: reqwest::Error) -> SdkError {
        if err.is_timeout() {
            SdkError::Timeout(self.config.request_timeout.as_millis() as u64)
        } else if err.is_decode() {
            SdkError::Serialization(err.to_string())
        } else {
            SdkError::Connection(err.to_string())
        }
    }

    // =========================================================================
    // Instances
    // =========================================================================

    /// Ask upstream to start instances of a configuration.
    #[instrument(skip(self, request))]
    pub async fn create_instances(
        &self,
        configuration_id: &str,
        request: &CreateInstancesRequest,
    ) -> Result<()> {
        debug!("Creating instance");
        self.send_body(
            Method::POST,
            &format!("configurations/{}/instances", configuration_id),
            request,
        )
        .await
    }

    /// List instances of a configuration, most recent first.
    #[instrument(skip(self))]
    pub async fn list_instances(&self, configuration_id: &str) -> Result<Vec<InstanceSummary>> {
        debug!("Listing instances");
        self.send_json(self.request(
            Method::GET,
            &format!("configurations/{}/instances", configuration_id),
        ))
        .await
    }

    /// Fetch a single instance.
    #[instrument(skip(self))]
    pub async fn get_instance(&self, instance_id: &str) -> Result<InstanceSummary> {
        debug!("Getting instance");
        self.send_json(self.request(Method::GET, &format!("instances/{}", instance_id)))
            .await
    }

    /// Stop and delete an instance.
    ///
    /// Only 200 and 204 count as success; any other status (including other 2xx)
    /// is reported as a rejection.
    #[instrument(skip(self))]
    pub async fn delete_instance(&self, instance_id: &str) -> Result<()> {
        debug!("Deleting instance");
        let response = self
            .request(Method::DELETE, &format!("instances/{}", instance_id))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            _ => Err(rejected(response).await),
        }
    }

    /// Toggle outputs for every instance of a configuration.
    #[instrument(skip(self))]
    pub async fn set_outputs(&self, configuration_id: &str, state: OutputState) -> Result<()> {
        debug!("Setting outputs");
        self.send_body(
            Method::PUT,
            &format!("configurations/{}/instances", configuration_id),
            &OutputsUpdate { outputs: state },
        )
        .await
    }

    /// Apply element overrides to a running instance.
    #[instrument(skip(self, overrides))]
    pub async fn patch_overrides(&self, instance_id: &str, overrides: &Value) -> Result<()> {
        debug!("Patching overrides");
        self.send_body(
            Method::PATCH,
            &format!("instances/{}/overrides", instance_id),
            overrides,
        )
        .await
    }

    // =========================================================================
    // Account & configuration
    // =========================================================================

    /// List publishing destinations.
    #[instrument(skip(self))]
    pub async fn list_destinations(&self) -> Result<Vec<Destination>> {
        debug!("Listing destinations");
        self.send_json(self.request(Method::GET, "destinations"))
            .await
    }

    /// Fetch a configuration document, including its element list.
    #[instrument(skip(self))]
    pub async fn get_configuration(&self, configuration_id: &str) -> Result<ConfigurationDocument> {
        debug!("Getting configuration");
        self.send_json(self.request(
            Method::GET,
            &format!("configurations/{}", configuration_id),
        ))
        .await
    }
}

async fn rejected(response: reqwest::Response) -> SdkError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    warn!(status, body = %body, "Upstream rejected request");
    SdkError::Rejected { status, body }
}
