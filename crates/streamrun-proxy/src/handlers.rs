// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Command handlers.
//!
//! Each handler runs one tracker/catalog operation and renders the outcome as
//! the plain-text reply the chat bot substitutes into its message. Errors are
//! rendered too; handlers never fail.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::element_catalog::{CategorizedElements, Category, ElementCatalog};
use crate::error::Error;
use crate::instance_tracker::{InstanceRecord, InstanceTracker, StartOutcome};
use crate::upstream::StreamrunApi;

/// Shared state for proxy handlers.
pub struct ProxyHandlerState {
    /// Tracked instance.
    pub tracker: InstanceTracker,
    /// Input categories and switch target.
    pub catalog: ElementCatalog,
    /// Upstream API, for calls that touch neither tracker nor catalog.
    pub api: Arc<dyn StreamrunApi>,
    /// When the server started (for uptime calculation).
    pub start_time: std::time::Instant,
    /// Server version string.
    pub version: String,
}

impl ProxyHandlerState {
    /// Create handler state for one upstream configuration.
    pub fn new(api: Arc<dyn StreamrunApi>, configuration_id: impl Into<String>) -> Self {
        let configuration_id = configuration_id.into();
        Self {
            tracker: InstanceTracker::new(api.clone(), configuration_id.clone()),
            catalog: ElementCatalog::new(api.clone(), configuration_id),
            api,
            start_time: std::time::Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get the server uptime in milliseconds.
    pub fn uptime_ms(&self) -> i64 {
        self.start_time.elapsed().as_millis() as i64
    }
}

fn render_error(operation: &str, err: Error) -> String {
    if err.is_informational() {
        info!(operation, "{}", err);
    } else {
        warn!(operation, error = %err, "Command failed");
    }
    err.to_string()
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// Always true while the process serves requests.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Server uptime in milliseconds.
    pub uptime_ms: i64,
    /// Whether an instance is tracked; `null` while a command is in flight.
    pub tracking_instance: Option<bool>,
}

/// Handle health check request.
pub async fn handle_health_check(state: &ProxyHandlerState) -> HealthCheckResponse {
    HealthCheckResponse {
        healthy: true,
        version: state.version.clone(),
        uptime_ms: state.uptime_ms(),
        tracking_instance: state.tracker.try_is_tracking(),
    }
}

// ============================================================================
// Instance Lifecycle
// ============================================================================

/// Handle `status`: refresh and report the tracked instance's label.
pub async fn handle_status(state: &ProxyHandlerState) -> String {
    match state.tracker.refresh_status().await {
        Ok(label) => label,
        Err(e) => render_error("status", e),
    }
}

/// Handle `golive`: start (or adopt) an instance.
pub async fn handle_start(state: &ProxyHandlerState, destination_id: Option<&str>) -> String {
    match state.tracker.start(destination_id).await {
        Ok(StartOutcome::Started { .. }) => {
            "Starting stream, please wait ~20 seconds...".to_string()
        }
        Ok(StartOutcome::AlreadyRunning {
            instance_id,
            state: label,
        }) => format!("Stream already running ({} is {})", instance_id, label),
        Ok(StartOutcome::Requested) => {
            "Stream starting. Run !status to confirm.".to_string()
        }
        Err(e) => render_error("start", e),
    }
}

/// Handle `stop`.
pub async fn handle_stop(state: &ProxyHandlerState) -> String {
    match state.tracker.stop().await {
        Ok(instance_id) => format!("Stream stopped ({})", instance_id),
        Err(Error::NoActiveInstance) => "No active instance".to_string(),
        Err(e) => render_error("stop", e),
    }
}

/// Handle `outputs`: toggle LIVE/OFFLINE.
pub async fn handle_set_outputs(state: &ProxyHandlerState, requested: &str) -> String {
    match state.tracker.set_outputs(requested).await {
        Ok(outputs) => format!("Outputs {}", outputs),
        Err(e) => render_error("outputs", e),
    }
}

/// Handle `switch-ingest`: route an element through the switch.
pub async fn handle_switch_input(state: &ProxyHandlerState, element_id: Option<&str>) -> String {
    let Some(element_id) = element_id.filter(|id| !id.is_empty()) else {
        return "Missing ingest_id".to_string();
    };

    match state
        .tracker
        .switch_input(&state.catalog, element_id)
        .await
    {
        Ok(()) => format!("Ingest switched to {}", element_id),
        Err(e) => render_error("switch-ingest", e),
    }
}

/// Handle `set-instance`: overwrite the tracked id.
pub async fn handle_manual_set(state: &ProxyHandlerState, instance_id: Option<&str>) -> String {
    let Some(instance_id) = instance_id.filter(|id| !id.is_empty()) else {
        return "Missing instance_id".to_string();
    };

    state.tracker.manual_set(instance_id).await;
    format!("Set current instance to {}", instance_id)
}

/// Handle `current`: report the tracked record without contacting upstream.
pub async fn handle_current(state: &ProxyHandlerState) -> String {
    match state.tracker.current().await {
        Some((instance_id, started_at)) => format!(
            "Current instance: {} (started: {})",
            instance_id,
            started_at.as_deref().unwrap_or("unknown")
        ),
        None => "No active instance stored".to_string(),
    }
}

/// Tracked record, for the dashboard.
pub async fn handle_instance_data(state: &ProxyHandlerState) -> InstanceRecord {
    state.tracker.snapshot().await
}

// ============================================================================
// Destinations & Elements
// ============================================================================

/// Handle `destinations`: list as `name: id | name: id`.
pub async fn handle_list_destinations(state: &ProxyHandlerState) -> String {
    match state.api.list_destinations().await {
        Ok(destinations) if destinations.is_empty() => "No destinations".to_string(),
        Ok(destinations) => destinations
            .iter()
            .map(|d| format!("{}: {}", d.name, d.id))
            .collect::<Vec<_>>()
            .join(" | "),
        Err(e) => render_error("destinations", e.into()),
    }
}

/// Category map and switch target, for the dashboard.
#[derive(Debug, Serialize)]
pub struct CategorizedResponse {
    /// Category map.
    #[serde(flatten)]
    pub elements: CategorizedElements,
    /// Switch element id.
    pub switch: Option<String>,
}

/// Categorized elements, for the dashboard.
pub async fn handle_categorized(state: &ProxyHandlerState) -> CategorizedResponse {
    CategorizedResponse {
        elements: state.catalog.categorized().await,
        switch: state.catalog.switch_target().await,
    }
}

/// Handle `refresh-ingests`: rebuild the catalog and summarise it.
pub async fn handle_refresh_catalog(state: &ProxyHandlerState) -> String {
    if let Err(e) = state.catalog.refresh().await {
        return render_error("refresh-ingests", e);
    }

    let elements = state.catalog.categorized().await;
    let mut parts: Vec<String> = Category::ALL
        .iter()
        .map(|category| {
            let name = elements
                .get(*category)
                .map(|e| e.name.as_str())
                .unwrap_or("none");
            format!("{}={}", category, name)
        })
        .collect();
    let switch = state.catalog.switch_target().await;
    parts.push(format!("switch={}", switch.as_deref().unwrap_or("none")));

    format!("Ingests refreshed: {}", parts.join(", "))
}
