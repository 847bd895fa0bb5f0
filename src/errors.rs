// ABOUTME: Error taxonomy for remote calls, envelope decoding, and the local mirror
// ABOUTME: Defines SyncError with structured context and the SyncResult alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use std::path::PathBuf;

/// Result alias used throughout the crate
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors produced by the reconciliation layer.
///
/// `Network` is the fallback trigger: reads degrade to the local mirror,
/// creates synthesize local-only records, updates patch the mirror in place.
/// `NotFound` and `MalformedResponse` propagate to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Remote call failed: timeout, connection failure, or non-2xx status
    #[error("request to {endpoint} failed: {reason}")]
    Network {
        /// Endpoint path that was called
        endpoint: String,
        /// Human-readable failure reason
        reason: String,
    },

    /// Identifier absent in the store that was consulted
    #[error("meal plan '{id}' not found")]
    NotFound {
        /// Identifier that could not be resolved
        id: String,
    },

    /// Response body did not match any recognized envelope shape
    #[error("unrecognized response shape from {endpoint}")]
    MalformedResponse {
        /// Endpoint path that produced the body
        endpoint: String,
        /// Raw payload, kept for diagnosis
        body: serde_json::Value,
    },

    /// Local mirror I/O failure
    #[error("local store access failed for {path}")]
    Storage {
        /// File that could not be read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Encoding the local mirror failed
    #[error("serialization failed for {context}")]
    Serialization {
        /// What was being serialized
        context: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration value
    #[error("invalid configuration for {key}: {reason}")]
    Config {
        /// Configuration key that failed validation
        key: &'static str,
        /// Reason why the value is invalid
        reason: String,
    },
}

impl SyncError {
    /// Map a transport-level `reqwest` failure to a `Network` error
    pub(crate) fn from_transport(endpoint: &str, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_owned()
        } else if err.is_connect() {
            "connection failed".to_owned()
        } else {
            err.to_string()
        };
        Self::Network {
            endpoint: endpoint.to_owned(),
            reason,
        }
    }

    /// Whether this error is a remote/network failure eligible for fallback
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
