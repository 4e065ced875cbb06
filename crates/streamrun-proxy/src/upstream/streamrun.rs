// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! [`StreamrunApi`] backed by the real HTTP client.

use async_trait::async_trait;
use serde_json::Value;
use streamrun_sdk::StreamrunClient;

use super::traits::*;

#[async_trait]
impl StreamrunApi for StreamrunClient {
    async fn create_instances(
        &self,
        configuration_id: &str,
        request: &CreateInstancesRequest,
    ) -> Result<()> {
        StreamrunClient::create_instances(self, configuration_id, request).await
    }

    async fn list_instances(&self, configuration_id: &str) -> Result<Vec<InstanceSummary>> {
        StreamrunClient::list_instances(self, configuration_id).await
    }

    async fn get_instance(&self, instance_id: &str) -> Result<InstanceSummary> {
        StreamrunClient::get_instance(self, instance_id).await
    }

    async fn delete_instance(&self, instance_id: &str) -> Result<()> {
        StreamrunClient::delete_instance(self, instance_id).await
    }

    async fn set_outputs(&self, configuration_id: &str, state: OutputState) -> Result<()> {
        StreamrunClient::set_outputs(self, configuration_id, state).await
    }

    async fn patch_overrides(&self, instance_id: &str, overrides: &Value) -> Result<()> {
        StreamrunClient::patch_overrides(self, instance_id, overrides).await
    }

    async fn list_destinations(&self) -> Result<Vec<Destination>> {
        StreamrunClient::list_destinations(self).await
    }

    async fn get_configuration(&self, configuration_id: &str) -> Result<ConfigurationDocument> {
        StreamrunClient::get_configuration(self, configuration_id).await
    }
}
