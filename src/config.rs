// ABOUTME: Environment-driven client configuration with validated defaults
// ABOUTME: Covers the API base URL, call timeouts, and the local mirror directory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use std::env;
use std::path::PathBuf;

use tracing::warn;
use url::Url;

use crate::errors::{SyncError, SyncResult};

/// Environment variable for the backend base URL
pub const ENV_API_URL: &str = "MACROTRACK_API_URL";
/// Environment variable for the request timeout in seconds
pub const ENV_REQUEST_TIMEOUT: &str = "MACROTRACK_REQUEST_TIMEOUT_SECS";
/// Environment variable for the connect timeout in seconds
pub const ENV_CONNECT_TIMEOUT: &str = "MACROTRACK_CONNECT_TIMEOUT_SECS";
/// Environment variable for the local mirror directory
pub const ENV_DATA_DIR: &str = "MACROTRACK_DATA_DIR";

const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client configuration, constructed once per session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend JSON API, without trailing slash
    pub api_base_url: String,
    /// Upper bound for any single remote call, in seconds
    pub request_timeout_secs: u64,
    /// Upper bound for establishing a connection, in seconds
    pub connect_timeout_secs: u64,
    /// Directory holding the durable local mirror files
    pub data_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            data_dir: default_data_dir(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment, applying defaults.
    ///
    /// An unset variable falls back to its default; an unparseable numeric
    /// value is logged and replaced with the default. An invalid base URL
    /// is a hard error since no remote call could ever succeed.
    pub fn from_env() -> SyncResult<Self> {
        let api_base_url = match env::var(ENV_API_URL) {
            Ok(raw) => validate_base_url(&raw)?,
            Err(_) => DEFAULT_API_URL.to_owned(),
        };

        Ok(Self {
            api_base_url,
            request_timeout_secs: env_u64(ENV_REQUEST_TIMEOUT, DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_u64(ENV_CONNECT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT_SECS),
            data_dir: env::var(ENV_DATA_DIR)
                .map_or_else(|_| default_data_dir(), PathBuf::from),
        })
    }
}

/// Default mirror location under the platform data directory
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("macrotrack")
}

fn validate_base_url(raw: &str) -> SyncResult<String> {
    let parsed = Url::parse(raw).map_err(|e| SyncError::Config {
        key: ENV_API_URL,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SyncError::Config {
            key: ENV_API_URL,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(raw.trim_end_matches('/').to_owned())
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring unparseable timeout, using default");
            default
        }),
        Err(_) => default,
    }
}
