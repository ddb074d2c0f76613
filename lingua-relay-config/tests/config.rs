// lingua-relay-config/tests/config.rs
// ============================================================================
// Module: Config Tests
// Description: Validate configuration parsing, defaults, and fail-closed checks.
// Purpose: Ensure invalid configuration never reaches the composition root.
// Dependencies: lingua-relay-config, lingua-relay-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! Tests for TOML parsing, section defaults, validation failures, file
//! loading, and provider API key resolution.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use lingua_relay_config::ConfigError;
use lingua_relay_config::RelayConfig;
use lingua_relay_config::StoreType;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Smallest valid configuration: only the token has no default.
const MINIMAL: &str = r#"
[server]
api_token = "secret-token"
"#;

// ============================================================================
// SECTION: Parsing Tests
// ============================================================================

#[test]
fn minimal_config_gets_defaults() {
    let config = RelayConfig::parse(MINIMAL).unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:8080");
    assert_eq!(config.store.store_type, StoreType::Memory);
    assert_eq!(config.queue.capacity, 256);
    assert_eq!(config.queue.max_redeliveries, 5);
    assert_eq!(config.provider.model, "gpt-4");
    assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
    assert_eq!(config.translation.source_language, "en");
    assert_eq!(config.translation.language_code().unwrap().as_str(), "en");
}

#[test]
fn full_config_parses() {
    let config = RelayConfig::parse(
        r#"
[server]
bind = "0.0.0.0:9090"
api_token = "secret-token"
max_body_bytes = 65536

[store]
type = "sqlite"
path = "/tmp/relay.sqlite"
busy_timeout_ms = 2500
journal_mode = "wal"
sync_mode = "normal"

[queue]
capacity = 64
max_redeliveries = 3

[provider]
api_url = "https://llm.internal/v1/chat/completions"
api_key = "inline-key"
model = "gpt-4o-mini"
timeout_ms = 10000
max_tokens = 500

[translation]
source_language = "en"
"#,
    )
    .unwrap();
    assert_eq!(config.server.bind_addr().unwrap().port(), 9090);
    assert_eq!(config.store.store_type, StoreType::Sqlite);
    assert_eq!(config.store.sqlite_config().unwrap().busy_timeout_ms, 2_500);
    assert_eq!(config.queue.capacity, 64);
    assert_eq!(config.provider.resolve_api_key().unwrap(), "inline-key");
}

#[test]
fn unknown_top_level_values_are_tolerated() {
    // toml deserialization ignores unknown fields by default; a typo in a
    // section name therefore falls back to defaults and must still validate.
    let config = RelayConfig::parse(
        r#"
[server]
api_token = "secret-token"

[quue]
capacity = 7
"#,
    )
    .unwrap();
    assert_eq!(config.queue.capacity, 256);
}

// ============================================================================
// SECTION: Validation Tests
// ============================================================================

#[test]
fn missing_token_fails_closed() {
    assert!(matches!(RelayConfig::parse("").unwrap_err(), ConfigError::Invalid(_)));
}

#[test]
fn bad_bind_address_is_rejected() {
    let err = RelayConfig::parse(
        r#"
[server]
bind = "not-an-address"
api_token = "secret-token"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("server.bind"));
}

#[test]
fn sqlite_store_without_path_is_rejected() {
    let err = RelayConfig::parse(
        r#"
[server]
api_token = "secret-token"

[store]
type = "sqlite"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("store.path"));
}

#[test]
fn zero_queue_capacity_is_rejected() {
    let err = RelayConfig::parse(
        r#"
[server]
api_token = "secret-token"

[queue]
capacity = 0
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("queue.capacity"));
}

#[test]
fn malformed_source_language_is_rejected() {
    let err = RelayConfig::parse(
        r#"
[server]
api_token = "secret-token"

[translation]
source_language = "english"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("language"));
}

#[test]
fn provider_timeout_out_of_range_is_rejected() {
    let err = RelayConfig::parse(
        r#"
[server]
api_token = "secret-token"

[provider]
timeout_ms = 1
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("provider.timeout_ms"));
}

// ============================================================================
// SECTION: File Loading Tests
// ============================================================================

#[test]
fn load_reads_explicit_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("relay.toml");
    fs::write(&path, MINIMAL).unwrap();

    let config = RelayConfig::load(Some(&path)).unwrap();
    assert_eq!(config.server.api_token, "secret-token");
}

#[test]
fn load_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let err = RelayConfig::load(Some(&temp.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
