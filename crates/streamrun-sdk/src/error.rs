// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for streamrun-sdk.

use thiserror::Error;

/// Result type using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors that can occur when talking to the streamrun API.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The API answered with a non-success status.
    ///
    /// The body is kept verbatim so callers can inspect upstream error text.
    #[error("upstream rejected request [{status}]: {body}")]
    Rejected { status: u16, body: String },

    /// Request timed out.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// Transport-level failure (DNS, refused connection, TLS).
    #[error("connection error: {0}")]
    Connection(String),

    /// Response body could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SdkError {
    /// HTTP status of a rejected request, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the API was never reached (or never answered).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, SdkError::Timeout(_) | SdkError::Connection(_))
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}
