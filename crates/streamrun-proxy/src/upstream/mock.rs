// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mock upstream for testing.
//!
//! An in-memory stand-in for the orchestration API with scripted contents,
//! scripted rejections, and a log of every call it receives.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::traits::*;

/// Mock upstream for testing.
#[derive(Default)]
pub struct MockUpstream {
    instances: Mutex<Vec<InstanceSummary>>,
    elements: Mutex<Vec<Element>>,
    destinations: Vec<Destination>,
    calls: Mutex<Vec<String>>,
    overrides: Mutex<Vec<(String, Value)>>,
    /// Instance inserted at the head of the list when a create is accepted
    spawn_on_create: Option<InstanceSummary>,
    /// Rejection returned by `create_instances` only
    create_rejection: Option<(u16, String)>,
    /// Rejection returned by every call
    rejection: Option<(u16, String)>,
    unreachable: AtomicBool,
}

impl MockUpstream {
    /// Create an empty mock upstream that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload the instance list (most recent first).
    pub fn with_instances(mut self, instances: Vec<InstanceSummary>) -> Self {
        self.instances = Mutex::new(instances);
        self
    }

    /// Preload the configuration's element list.
    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = Mutex::new(elements);
        self
    }

    /// Preload the account's destinations.
    pub fn with_destinations(mut self, destinations: Vec<Destination>) -> Self {
        self.destinations = destinations;
        self
    }

    /// Make an accepted create prepend `instance` to the instance list.
    pub fn spawning_on_create(mut self, instance: InstanceSummary) -> Self {
        self.spawn_on_create = Some(instance);
        self
    }

    /// Reject create requests with the given status and body.
    pub fn rejecting_create(mut self, status: u16, body: impl Into<String>) -> Self {
        self.create_rejection = Some((status, body.into()));
        self
    }

    /// Reject every request with the given status and body.
    pub fn rejecting(mut self, status: u16, body: impl Into<String>) -> Self {
        self.rejection = Some((status, body.into()));
        self
    }

    /// Simulate a network outage (or its end).
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Replace the element list.
    pub async fn set_elements(&self, elements: Vec<Element>) {
        *self.elements.lock().await = elements;
    }

    /// Every request received so far, as `"<METHOD> <path>"`.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    /// Override bodies received so far, keyed by instance id.
    pub async fn patched_overrides(&self) -> Vec<(String, Value)> {
        self.overrides.lock().await.clone()
    }

    async fn record(&self, call: String) -> Result<()> {
        self.calls.lock().await.push(call);

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(SdkError::Connection("mock upstream unreachable".to_string()));
        }
        if let Some((status, body)) = &self.rejection {
            return Err(SdkError::Rejected {
                status: *status,
                body: body.clone(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StreamrunApi for MockUpstream {
    async fn create_instances(
        &self,
        configuration_id: &str,
        _request: &CreateInstancesRequest,
    ) -> Result<()> {
        self.record(format!("POST configurations/{}/instances", configuration_id))
            .await?;

        if let Some((status, body)) = &self.create_rejection {
            return Err(SdkError::Rejected {
                status: *status,
                body: body.clone(),
            });
        }
        if let Some(instance) = &self.spawn_on_create {
            self.instances.lock().await.insert(0, instance.clone());
        }
        Ok(())
    }

    async fn list_instances(&self, configuration_id: &str) -> Result<Vec<InstanceSummary>> {
        self.record(format!("GET configurations/{}/instances", configuration_id))
            .await?;
        Ok(self.instances.lock().await.clone())
    }

    async fn get_instance(&self, instance_id: &str) -> Result<InstanceSummary> {
        self.record(format!("GET instances/{}", instance_id)).await?;
        self.instances
            .lock()
            .await
            .iter()
            .find(|i| i.id == instance_id)
            .cloned()
            .ok_or_else(|| SdkError::Rejected {
                status: 404,
                body: "instance not found".to_string(),
            })
    }

    async fn delete_instance(&self, instance_id: &str) -> Result<()> {
        self.record(format!("DELETE instances/{}", instance_id))
            .await?;
        self.instances.lock().await.retain(|i| i.id != instance_id);
        Ok(())
    }

    async fn set_outputs(&self, configuration_id: &str, state: OutputState) -> Result<()> {
        self.record(format!(
            "PUT configurations/{}/instances {}",
            configuration_id, state
        ))
        .await
    }

    async fn patch_overrides(&self, instance_id: &str, overrides: &Value) -> Result<()> {
        self.record(format!("PATCH instances/{}/overrides", instance_id))
            .await?;
        self.overrides
            .lock()
            .await
            .push((instance_id.to_string(), overrides.clone()));
        Ok(())
    }

    async fn list_destinations(&self) -> Result<Vec<Destination>> {
        self.record("GET destinations".to_string()).await?;
        Ok(self.destinations.clone())
    }

    async fn get_configuration(&self, configuration_id: &str) -> Result<ConfigurationDocument> {
        self.record(format!("GET configurations/{}", configuration_id))
            .await?;
        let mut document = ConfigurationDocument::default();
        document.configuration.id = configuration_id.to_string();
        document.configuration.elements = self.elements.lock().await.clone();
        Ok(document)
    }
}
