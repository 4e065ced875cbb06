// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP server for the chat-bot and dashboard surface.
//!
//! Every route answers 200. Command routes return plain text (success or error
//! message alike) because the bot substitutes the body verbatim into chat.

use axum::Router;
use axum::extract::{Query, State};
use axum::response::{Html, Json};
use axum::routing::get;
use serde::Deserialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Result;
use crate::handlers::{self, CategorizedResponse, HealthCheckResponse, ProxyHandlerState};
use crate::instance_tracker::InstanceRecord;

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

type SharedState = Arc<ProxyHandlerState>;

/// Query parameters accepted by the command routes.
#[derive(Debug, Default, Deserialize)]
pub struct CommandParams {
    /// Destination override for `golive`.
    pub destination_id: Option<String>,
    /// Output state for `outputs` (defaults to LIVE).
    pub state: Option<String>,
    /// Element to route for `switch-ingest`.
    pub ingest_id: Option<String>,
    /// Instance id for `set-instance`.
    pub instance_id: Option<String>,
}

/// Build the router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/golive", get(golive))
        .route("/api/stop", get(stop))
        .route("/api/outputs", get(outputs))
        .route("/api/switch-ingest", get(switch_ingest))
        .route("/api/destinations", get(destinations))
        .route("/api/set-instance", get(set_instance))
        .route("/api/current", get(current))
        .route("/api/refresh-ingests", get(refresh_ingests))
        .route("/api/instance-data", get(instance_data))
        .route("/api/ingests-categorized", get(ingests_categorized))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, state: SharedState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

async fn health(State(state): State<SharedState>) -> Json<HealthCheckResponse> {
    Json(handlers::handle_health_check(&state).await)
}

async fn status(State(state): State<SharedState>) -> String {
    handlers::handle_status(&state).await
}

async fn golive(State(state): State<SharedState>, Query(params): Query<CommandParams>) -> String {
    handlers::handle_start(&state, params.destination_id.as_deref()).await
}

async fn stop(State(state): State<SharedState>) -> String {
    handlers::handle_stop(&state).await
}

async fn outputs(State(state): State<SharedState>, Query(params): Query<CommandParams>) -> String {
    handlers::handle_set_outputs(&state, params.state.as_deref().unwrap_or("LIVE")).await
}

async fn switch_ingest(
    State(state): State<SharedState>,
    Query(params): Query<CommandParams>,
) -> String {
    handlers::handle_switch_input(&state, params.ingest_id.as_deref()).await
}

async fn destinations(State(state): State<SharedState>) -> String {
    handlers::handle_list_destinations(&state).await
}

async fn set_instance(
    State(state): State<SharedState>,
    Query(params): Query<CommandParams>,
) -> String {
    handlers::handle_manual_set(&state, params.instance_id.as_deref()).await
}

async fn current(State(state): State<SharedState>) -> String {
    handlers::handle_current(&state).await
}

async fn refresh_ingests(State(state): State<SharedState>) -> String {
    handlers::handle_refresh_catalog(&state).await
}

async fn instance_data(State(state): State<SharedState>) -> Json<InstanceRecord> {
    Json(handlers::handle_instance_data(&state).await)
}

async fn ingests_categorized(State(state): State<SharedState>) -> Json<CategorizedResponse> {
    Json(handlers::handle_categorized(&state).await)
}
