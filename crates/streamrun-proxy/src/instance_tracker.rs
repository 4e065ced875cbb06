// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Instance Tracker
//!
//! In-memory belief about "the current instance", reconciled against the
//! upstream API on demand. The record is a cache, not the source of truth: an
//! instance stopped out-of-band stays tracked until `refresh_status` or `stop`
//! observes otherwise.
//!
//! ```text
//!   ∅ ──start──► QUEUED / STARTING / RUNNING ──stop──► STOPPED (id cleared)
//!                        │
//!                 refresh_status: any upstream label, taken verbatim
//! ```

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::element_catalog::ElementCatalog;
use crate::error::{Error, Result};
use crate::upstream::{CreateInstancesRequest, OutputState, SdkError, StreamrunApi};

/// Label for an untracked or never-refreshed instance.
pub const STATE_UNKNOWN: &str = "UNKNOWN";
/// Label forced after a successful stop.
pub const STATE_STOPPED: &str = "STOPPED";
/// Label set after a successful start.
pub const STATE_RUNNING: &str = "RUNNING";

/// Upstream labels that count as "already running" during reconciliation.
pub const ACTIVE_STATES: &[&str] = &["RUNNING", "QUEUED", "STARTING"];

/// Upstream error text that signals the account has no free instance slots.
pub const CAPACITY_EXHAUSTED_PHRASES: &[&str] = &["0 instance slots"];

/// Name given to instances created by the proxy.
const INSTANCE_NAME: &str = "livestream";

/// Whether an upstream error body reports slot exhaustion.
///
/// Matches are case-insensitive and must not be preceded by a digit, so
/// "10 instance slots" does not count.
pub fn is_capacity_exhausted(body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    CAPACITY_EXHAUSTED_PHRASES.iter().any(|phrase| {
        body.match_indices(phrase).any(|(at, _)| {
            !body[..at]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_digit())
        })
    })
}

/// Whether an upstream lifecycle label counts as an active instance.
pub fn is_active_state(state: &str) -> bool {
    ACTIVE_STATES.contains(&state)
}

/// The tracked instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceRecord {
    /// Upstream handle, `None` when nothing is tracked.
    pub id: Option<String>,
    /// Local creation time, or the upstream timestamp when adopted.
    pub started_at: Option<String>,
    /// Last-known lifecycle label.
    pub state: String,
}

impl Default for InstanceRecord {
    fn default() -> Self {
        Self {
            id: None,
            started_at: None,
            state: STATE_UNKNOWN.to_string(),
        }
    }
}

impl InstanceRecord {
    fn adopt(&mut self, id: String, started_at: Option<String>, state: String) {
        self.id = Some(id);
        self.started_at = Some(started_at.unwrap_or_else(now));
        self.state = state;
    }
}

/// Result of a start request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new instance was created and adopted.
    Started {
        /// Adopted instance id.
        instance_id: String,
    },
    /// Upstream had no free slots; an existing active instance was adopted instead.
    AlreadyRunning {
        /// Adopted instance id.
        instance_id: String,
        /// Its upstream label.
        state: String,
    },
    /// Upstream accepted the request but no instance could be listed yet.
    Requested,
}

/// Owns the tracked instance record.
pub struct InstanceTracker {
    api: Arc<dyn StreamrunApi>,
    configuration_id: String,
    record: Mutex<InstanceRecord>,
}

impl InstanceTracker {
    /// Create a tracker with nothing tracked.
    pub fn new(api: Arc<dyn StreamrunApi>, configuration_id: impl Into<String>) -> Self {
        Self {
            api,
            configuration_id: configuration_id.into(),
            record: Mutex::new(InstanceRecord::default()),
        }
    }

    /// Whether an instance is tracked, without waiting.
    ///
    /// `None` while another command holds the record (e.g. a start waiting on upstream).
    pub fn try_is_tracking(&self) -> Option<bool> {
        self.record.try_lock().ok().map(|record| record.id.is_some())
    }

    /// Copy of the tracked record.
    pub async fn snapshot(&self) -> InstanceRecord {
        self.record.lock().await.clone()
    }

    /// Tracked id and start time, if an instance is tracked.
    pub async fn current(&self) -> Option<(String, Option<String>)> {
        let record = self.record.lock().await;
        record
            .id
            .clone()
            .map(|id| (id, record.started_at.clone()))
    }

    /// Start an instance, optionally routing the primary output to `destination`.
    ///
    /// The record lock is held for the whole create-then-adopt sequence.
    pub async fn start(&self, destination: Option<&str>) -> Result<StartOutcome> {
        let mut record = self.record.lock().await;

        let mut request = CreateInstancesRequest::single(INSTANCE_NAME);
        if let Some(destination) = destination.filter(|d| !d.is_empty()) {
            request = request.with_destination_override(destination);
        }

        info!(
            configuration_id = %self.configuration_id,
            destination = destination.unwrap_or(""),
            "Start instance request"
        );

        match self
            .api
            .create_instances(&self.configuration_id, &request)
            .await
        {
            Ok(()) => {}
            Err(SdkError::Rejected { status, body }) if is_capacity_exhausted(&body) => {
                warn!(status, "No free instance slots, reconciling with upstream");
                return self.adopt_active(&mut record, body).await;
            }
            Err(e) => {
                warn!(status = ?e.status(), error = %e, "Start instance failed");
                return Err(e.into());
            }
        }

        let instances = match self.api.list_instances(&self.configuration_id).await {
            Ok(instances) => instances,
            Err(e) => {
                warn!(error = %e, "Instance created but listing failed");
                return Ok(StartOutcome::Requested);
            }
        };

        match instances.into_iter().next().filter(|i| !i.id.is_empty()) {
            Some(latest) => {
                record.adopt(latest.id.clone(), None, STATE_RUNNING.to_string());
                info!(instance_id = %latest.id, "Instance started");
                Ok(StartOutcome::Started {
                    instance_id: latest.id,
                })
            }
            None => {
                debug!("Instance created but not listed yet");
                Ok(StartOutcome::Requested)
            }
        }
    }

    async fn adopt_active(
        &self,
        record: &mut InstanceRecord,
        rejection: String,
    ) -> Result<StartOutcome> {
        let instances = self.api.list_instances(&self.configuration_id).await?;

        let Some(active) = instances
            .into_iter()
            .find(|i| !i.id.is_empty() && is_active_state(&i.state))
        else {
            return Err(Error::CapacityExhausted(rejection.trim().to_string()));
        };

        record.adopt(
            active.id.clone(),
            active.created_at.clone(),
            active.state.clone(),
        );
        info!(instance_id = %active.id, state = %active.state, "Adopted running instance");

        Ok(StartOutcome::AlreadyRunning {
            instance_id: active.id,
            state: active.state,
        })
    }

    /// Stop the tracked instance. Returns the id that was stopped.
    pub async fn stop(&self) -> Result<String> {
        let mut record = self.record.lock().await;
        let instance_id = record.id.clone().ok_or(Error::NoActiveInstance)?;

        self.api.delete_instance(&instance_id).await.map_err(|e| {
            warn!(instance_id = %instance_id, error = %e, "Stop instance failed");
            Error::from(e)
        })?;

        record.id = None;
        record.state = STATE_STOPPED.to_string();
        info!(instance_id = %instance_id, "Instance stopped");

        Ok(instance_id)
    }

    /// Query upstream for the tracked instance and store its label verbatim.
    pub async fn refresh_status(&self) -> Result<String> {
        let mut record = self.record.lock().await;
        let instance_id = record.id.clone().ok_or(Error::NoActiveInstance)?;

        let instance = self.api.get_instance(&instance_id).await?;
        debug!(instance_id = %instance_id, state = %instance.state, "Instance status refreshed");
        record.state = instance.state;

        Ok(record.state.clone())
    }

    /// Toggle outputs of the containing configuration.
    ///
    /// `state` is validated before anything else happens.
    pub async fn set_outputs(&self, state: &str) -> Result<OutputState> {
        let state = state
            .parse::<OutputState>()
            .map_err(|e| Error::Validation(e.to_string()))?;

        let record = self.record.lock().await;
        if record.id.is_none() {
            return Err(Error::NoActiveInstance);
        }

        self.api
            .set_outputs(&self.configuration_id, state)
            .await?;
        info!(outputs = %state, "Outputs updated");

        Ok(state)
    }

    /// Overwrite the tracked record without asking upstream.
    pub async fn manual_set(&self, instance_id: impl Into<String>) {
        let instance_id = instance_id.into();
        let mut record = self.record.lock().await;
        record.adopt(instance_id.clone(), None, STATE_UNKNOWN.to_string());
        info!(instance_id = %instance_id, "Tracked instance set manually");
    }

    /// Route `element_id` through the catalog's switch element on the tracked instance.
    ///
    /// `element_id` is forwarded as-is; it need not be a categorized element.
    pub async fn switch_input(&self, catalog: &ElementCatalog, element_id: &str) -> Result<()> {
        let record = self.record.lock().await;
        let instance_id = record.id.clone().ok_or(Error::NoActiveInstance)?;
        let switch_id = catalog
            .switch_target()
            .await
            .ok_or(Error::SwitchElementNotFound)?;

        let mut overrides = Map::new();
        overrides.insert(switch_id.clone(), json!({ "input": element_id }));
        self.api
            .patch_overrides(&instance_id, &Value::Object(overrides))
            .await?;
        info!(
            instance_id = %instance_id,
            switch_id = %switch_id,
            element_id = %element_id,
            "Input switched"
        );

        Ok(())
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_predicate() {
        assert!(is_capacity_exhausted("You have 0 instance slots left"));
        assert!(is_capacity_exhausted(r#"{"message":"0 INSTANCE SLOTS available"}"#));
        assert!(!is_capacity_exhausted("10 instance slots available"));
        assert!(!is_capacity_exhausted("invalid configuration"));
        assert!(!is_capacity_exhausted(""));
    }

    #[test]
    fn test_active_states() {
        assert!(is_active_state("RUNNING"));
        assert!(is_active_state("QUEUED"));
        assert!(is_active_state("STARTING"));
        assert!(!is_active_state("STOPPED"));
        assert!(!is_active_state("running"));
    }

    #[test]
    fn test_default_record_is_untracked() {
        let record = InstanceRecord::default();
        assert!(record.id.is_none());
        assert_eq!(record.state, STATE_UNKNOWN);
    }
}
