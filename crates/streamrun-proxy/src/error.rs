// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for streamrun-proxy.
//!
//! `Display` output is the text sent back to the chat bot, so variants read as
//! short user-facing sentences.

use streamrun_sdk::SdkError;
use thiserror::Error;

/// Proxy errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An instance-scoped command arrived while nothing is tracked.
    #[error("No active instance. Go live first.")]
    NoActiveInstance,

    /// Upstream answered with a non-success status.
    #[error("Error {status}: {body}")]
    UpstreamRejected {
        /// HTTP status returned upstream.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// Upstream could not be reached or did not answer in time.
    #[error("Error: streamrun unreachable ({0})")]
    UpstreamUnreachable(String),

    /// Upstream has no free slots and no running instance could be adopted.
    #[error("No instance slots available and no running instance found: {0}")]
    CapacityExhausted(String),

    /// A caller-supplied parameter is outside the allowed set.
    #[error("{0}")]
    Validation(String),

    /// The configuration has no switch element to route inputs through.
    #[error("Switch element not found. Refresh ingests and try again.")]
    SwitchElementNotFound,

    /// Upstream answered with a body we could not decode.
    #[error("Error parsing upstream response: {0}")]
    UnexpectedResponse(String),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this outcome is informational rather than a failure.
    pub fn is_informational(&self) -> bool {
        matches!(self, Error::NoActiveInstance)
    }
}

impl From<SdkError> for Error {
    fn from(err: SdkError) -> Self {
        if err.is_unreachable() {
            return Error::UpstreamUnreachable(err.to_string());
        }
        match err {
            SdkError::Rejected { status, body } => Error::UpstreamRejected {
                status,
                body: body.trim().to_string(),
            },
            SdkError::Serialization(msg) => Error::UnexpectedResponse(msg),
            SdkError::Timeout(_) | SdkError::Connection(_) | SdkError::Config(_) => {
                Error::Other(err.to_string())
            }
        }
    }
}

/// Result type using proxy Error.
pub type Result<T> = std::result::Result<T, Error>;
