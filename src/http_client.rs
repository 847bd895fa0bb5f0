// ABOUTME: Shared HTTP client with connection pooling for backend API calls
// ABOUTME: Built once per session from ClientConfig; later calls reuse the pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::config::ClientConfig;

/// Timeout bounds applied to every backend call
#[derive(Debug, Clone, Copy)]
struct HttpTimeouts {
    request_secs: u64,
    connect_secs: u64,
}

impl Default for HttpTimeouts {
    /// Ten-second bound on both phases, used when no configuration was applied
    fn default() -> Self {
        Self {
            request_secs: 10,
            connect_secs: 10,
        }
    }
}

static TIMEOUTS: OnceLock<HttpTimeouts> = OnceLock::new();
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Apply the session configuration to the shared client.
///
/// Call once at session startup, before the first remote operation; a
/// second call is a no-op, and skipping it leaves the 10 s defaults in
/// place.
pub fn initialize_shared_client(config: &ClientConfig) {
    let _ = TIMEOUTS.set(HttpTimeouts {
        request_secs: config.request_timeout_secs,
        connect_secs: config.connect_timeout_secs,
    });
}

/// The process-wide HTTP client used for all backend calls.
///
/// Connections are pooled across stores; a timed-out or failed request
/// surfaces as a transport error that the reconciliation layer maps to
/// [`crate::errors::SyncError::Network`].
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let timeouts = TIMEOUTS.get().copied().unwrap_or_default();
        ClientBuilder::new()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}
