// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Wire types for the streamrun API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

/// Name of the output stream element whose destinations a start override targets.
pub const PRIMARY_OUTPUT_STREAM: &str = "outputstream-1";

/// Instance entry as returned by the instance endpoints.
///
/// `state` is kept as the raw upstream label; the set of values is not closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSummary {
    /// Opaque instance handle.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub id: String,
    /// Lifecycle label (`QUEUED`, `STARTING`, `RUNNING`, ...).
    #[serde(default = "unknown_state", deserialize_with = "state_or_unknown")]
    pub state: String,
    /// Creation timestamp as reported upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Display name given at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn unknown_state() -> String {
    "UNKNOWN".to_string()
}

// Upstream sends `null` as freely as it omits keys; both fall back to the default.

fn null_as<'de, D>(deserializer: D, fallback: fn() -> String) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(fallback))
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    null_as(deserializer, String::new)
}

fn state_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    null_as(deserializer, unknown_state)
}

fn id_or_placeholder<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    null_as(deserializer, no_id)
}

fn name_or_unknown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    null_as(deserializer, unknown_name)
}

impl InstanceSummary {
    /// Create a summary with just an id and state.
    pub fn new(id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: state.into(),
            created_at: None,
            name: None,
        }
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }
}

/// Envelope returned by `GET configurations/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigurationDocument {
    /// The configuration itself.
    #[serde(default)]
    pub configuration: Configuration,
}

/// A pipeline template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Configuration id.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub id: String,
    /// Human-readable title.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    /// Nodes of the pipeline (inputs, switches, screens, outputs).
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// A node within a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element id, used as the key in instance overrides.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub id: String,
    /// Title shown in the upstream editor; classification matches on it.
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    /// Element kind (`input`, `switch`, ...).
    #[serde(default, rename = "type", deserialize_with = "string_or_empty")]
    pub element_type: String,
}

impl Element {
    /// Create an element.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        element_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            element_type: element_type.into(),
        }
    }
}

/// A publishing destination registered on the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Destination id, passed as a start override.
    #[serde(default = "no_id", deserialize_with = "id_or_placeholder")]
    pub id: String,
    /// Display name.
    #[serde(default = "unknown_name", deserialize_with = "name_or_unknown")]
    pub name: String,
}

fn no_id() -> String {
    "no-id".to_string()
}

fn unknown_name() -> String {
    "unknown".to_string()
}

/// Per-instance settings inside a create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceSettings {
    /// Instance display name.
    pub name: String,
    /// Element overrides keyed by element id.
    #[serde(default)]
    pub overrides: Map<String, Value>,
}

/// Body of `POST configurations/{id}/instances`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstancesRequest {
    /// How many instances to create.
    pub number_of_instances: u32,
    /// Settings per instance.
    pub instance_settings: Vec<InstanceSettings>,
}

impl CreateInstancesRequest {
    /// Request a single instance with no overrides.
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            number_of_instances: 1,
            instance_settings: vec![InstanceSettings {
                name: name.into(),
                overrides: Map::new(),
            }],
        }
    }

    /// Route the primary output stream to `destination` instead of the configured default.
    pub fn with_destination_override(mut self, destination: impl Into<String>) -> Self {
        let destination = destination.into();
        for settings in &mut self.instance_settings {
            settings.overrides.insert(
                PRIMARY_OUTPUT_STREAM.to_string(),
                json!({ "destinations": [destination] }),
            );
        }
        self
    }
}

/// Dissemination toggle for the produced stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputState {
    /// Outputs publish to their destinations.
    Live,
    /// Outputs are held back.
    Offline,
}

impl OutputState {
    /// Wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputState::Live => "LIVE",
            OutputState::Offline => "OFFLINE",
        }
    }
}

impl fmt::Display for OutputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown output state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid output state '{0}', use LIVE or OFFLINE")]
pub struct InvalidOutputState(pub String);

impl FromStr for OutputState {
    type Err = InvalidOutputState;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LIVE" => Ok(OutputState::Live),
            "OFFLINE" => Ok(OutputState::Offline),
            _ => Err(InvalidOutputState(s.to_string())),
        }
    }
}

/// Body of `PUT configurations/{id}/instances`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputsUpdate {
    /// Requested state.
    pub outputs: OutputState,
}
