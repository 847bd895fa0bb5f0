// ABOUTME: Tests for environment-driven configuration defaults and overrides
// ABOUTME: Serialized because the process environment is shared state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;

use serial_test::serial;

use macrotrack_client::config::{
    ClientConfig, ENV_API_URL, ENV_CONNECT_TIMEOUT, ENV_DATA_DIR, ENV_REQUEST_TIMEOUT,
};
use macrotrack_client::SyncError;

fn clear_env() {
    for key in [
        ENV_API_URL,
        ENV_REQUEST_TIMEOUT,
        ENV_CONNECT_TIMEOUT,
        ENV_DATA_DIR,
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn defaults_apply_when_nothing_is_set() {
    clear_env();
    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.api_base_url, "http://localhost:3000/api");
    assert_eq!(config.request_timeout_secs, 10);
    assert_eq!(config.connect_timeout_secs, 10);
}

#[test]
#[serial]
fn environment_overrides_are_honored() {
    clear_env();
    env::set_var(ENV_API_URL, "https://app.example.com/api/");
    env::set_var(ENV_REQUEST_TIMEOUT, "5");
    env::set_var(ENV_DATA_DIR, "/tmp/macrotrack-test");

    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.api_base_url, "https://app.example.com/api");
    assert_eq!(config.request_timeout_secs, 5);
    assert_eq!(config.data_dir, PathBuf::from("/tmp/macrotrack-test"));
    clear_env();
}

#[test]
#[serial]
fn unparseable_timeout_falls_back_to_default() {
    clear_env();
    env::set_var(ENV_REQUEST_TIMEOUT, "soon");
    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.request_timeout_secs, 10);
    clear_env();
}

#[test]
#[serial]
fn invalid_base_url_is_a_hard_error() {
    clear_env();
    env::set_var(ENV_API_URL, "not a url");
    let err = ClientConfig::from_env().unwrap_err();
    assert!(matches!(err, SyncError::Config { .. }));
    clear_env();
}
