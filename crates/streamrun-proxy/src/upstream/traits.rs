// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Upstream trait definitions.

use async_trait::async_trait;
use serde_json::Value;

pub use streamrun_sdk::{
    ConfigurationDocument, CreateInstancesRequest, Destination, Element, InstanceSummary,
    OutputState, SdkError,
};

/// Result type for upstream calls.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Operations the proxy needs from the orchestration API.
///
/// Each method maps to exactly one upstream request.
#[async_trait]
pub trait StreamrunApi: Send + Sync {
    /// `POST configurations/{id}/instances`
    async fn create_instances(
        &self,
        configuration_id: &str,
        request: &CreateInstancesRequest,
    ) -> Result<()>;

    /// `GET configurations/{id}/instances`, most recent first.
    async fn list_instances(&self, configuration_id: &str) -> Result<Vec<InstanceSummary>>;

    /// `GET instances/{id}`
    async fn get_instance(&self, instance_id: &str) -> Result<InstanceSummary>;

    /// `DELETE instances/{id}`
    async fn delete_instance(&self, instance_id: &str) -> Result<()>;

    /// `PUT configurations/{id}/instances`
    async fn set_outputs(&self, configuration_id: &str, state: OutputState) -> Result<()>;

    /// `PATCH instances/{id}/overrides`
    async fn patch_overrides(&self, instance_id: &str, overrides: &Value) -> Result<()>;

    /// `GET destinations`
    async fn list_destinations(&self) -> Result<Vec<Destination>>;

    /// `GET configurations/{id}`
    async fn get_configuration(&self, configuration_id: &str) -> Result<ConfigurationDocument>;
}
