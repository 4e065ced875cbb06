// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Streamrun SDK
//!
//! Thin async client for the streamrun orchestration API.
//!
//! # Resources
//!
//! | Call | Request |
//! |------|---------|
//! | `create_instances` | `POST configurations/{id}/instances` |
//! | `list_instances` | `GET configurations/{id}/instances` |
//! | `set_outputs` | `PUT configurations/{id}/instances` |
//! | `get_configuration` | `GET configurations/{id}` |
//! | `get_instance` | `GET instances/{id}` |
//! | `delete_instance` | `DELETE instances/{id}` |
//! | `patch_overrides` | `PATCH instances/{id}/overrides` |
//! | `list_destinations` | `GET destinations` |
//!
//! # Example
//!
//! ```no_run
//! use streamrun_sdk::{CreateInstancesRequest, SdkConfig, StreamrunClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StreamrunClient::new(SdkConfig::from_env()?)?;
//!
//! let request = CreateInstancesRequest::single("livestream");
//! client.create_instances("my-configuration", &request).await?;
//!
//! for instance in client.list_instances("my-configuration").await? {
//!     println!("{} is {}", instance.id, instance.state);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::StreamrunClient;
pub use config::{DEFAULT_BASE_URL, PLACEHOLDER_API_KEY, SdkConfig};
pub use error::{Result, SdkError};
pub use types::{
    Configuration, ConfigurationDocument, CreateInstancesRequest, Destination, Element,
    InstanceSettings, InstanceSummary, InvalidOutputState, OutputState, OutputsUpdate,
    PRIMARY_OUTPUT_STREAM,
};
