// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Streamrun Proxy - Chat-bot Front for a Streaming Orchestrator
//!
//! Turns the streamrun REST API into short GET commands a chat bot can call
//! and substitute into its replies, plus a small browser dashboard.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │   Chat bot (!golive) │      │  Browser dashboard   │
//! └──────────┬───────────┘      └──────────┬───────────┘
//!            │ plain text                  │ JSON + plain text
//!            ▼                             ▼
//! ┌─────────────────────────────────────────────────────┐
//! │            streamrun-proxy (This Crate)             │
//! │  ┌──────────────────┐      ┌──────────────────┐     │
//! │  │ InstanceTracker  │─────►│  ElementCatalog  │     │
//! │  └────────┬─────────┘      └────────┬─────────┘     │
//! └───────────┼─────────────────────────┼───────────────┘
//!             │       StreamrunApi      │
//!             ▼                         ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                streamrun REST API                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Commands
//!
//! | Route | Description |
//! |-------|-------------|
//! | `/api/golive` | Start an instance, or adopt the running one when no slots are free |
//! | `/api/stop` | Stop the tracked instance |
//! | `/api/status` | Refresh the tracked instance's lifecycle label |
//! | `/api/outputs?state=LIVE\|OFFLINE` | Toggle outputs |
//! | `/api/switch-ingest?ingest_id=` | Route an input through the switch element |
//! | `/api/destinations` | List publishing destinations |
//! | `/api/set-instance?instance_id=` | Overwrite the tracked id |
//! | `/api/current` | Show the tracked id |
//! | `/api/refresh-ingests` | Rebuild the element catalog |
//!
//! Every command answers HTTP 200; failures are reported in the body.
//!
//! # Configuration
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STREAMRUN_API_KEY` | placeholder | Bearer token |
//! | `STREAMRUN_CONFIGURATION_ID` | placeholder | Managed configuration |
//! | `STREAMRUN_BASE_URL` | `https://streamrun.com/api/v1` | API root |
//! | `STREAMRUN_PROXY_PORT` | `5000` | HTTP port |
//! | `STREAMRUN_REQUEST_TIMEOUT_MS` | `10000` | Upstream request timeout |
//! | `STREAMRUN_CONNECT_TIMEOUT_MS` | `5000` | Upstream connect timeout |

#![deny(missing_docs)]

/// Proxy configuration loaded from environment variables.
pub mod config;

/// Error types for proxy operations.
pub mod error;

/// Upstream API seam and its mock.
pub mod upstream;

/// Tracked instance and its reconciliation with upstream.
pub mod instance_tracker;

/// Input categories and switch element discovery.
pub mod element_catalog;

/// Command handlers rendering bot replies.
pub mod handlers;

/// axum router and server.
pub mod server;

pub use config::Config;
pub use error::Error;
