// lingua-relay-config/src/config.rs
// ============================================================================
// Module: Lingua Relay Configuration
// Description: Configuration loading and validation for the relay server.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: lingua-relay-core, lingua-relay-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. Every
//! section validates before the server starts; missing or invalid
//! configuration fails closed rather than falling back to permissive
//! defaults. The provider API key may live inline or in an environment
//! variable named by the config, never hard-coded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use lingua_relay_core::LanguageCode;
use lingua_relay_store_sqlite::SqliteJournalMode;
use lingua_relay_store_sqlite::SqliteStoreConfig;
use lingua_relay_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "lingua-relay.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "LINGUA_RELAY_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of the server auth token.
pub(crate) const MAX_AUTH_TOKEN_LENGTH: usize = 256;
/// Maximum allowed queue capacity.
pub(crate) const MAX_QUEUE_CAPACITY: usize = 65_536;
/// Maximum allowed redeliveries per task.
pub(crate) const MAX_REDELIVERIES: u32 = 100;
/// Minimum provider request timeout in milliseconds.
pub(crate) const MIN_PROVIDER_TIMEOUT_MS: u64 = 500;
/// Maximum provider request timeout in milliseconds.
pub(crate) const MAX_PROVIDER_TIMEOUT_MS: u64 = 120_000;
/// Maximum provider completion tokens per translation.
pub(crate) const MAX_PROVIDER_MAX_TOKENS: u32 = 32_768;
/// Default HTTP request body limit in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config contents failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Lingua Relay server configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RelayConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Task queue configuration.
    #[serde(default)]
    pub queue: QueueSection,
    /// Translation provider configuration.
    #[serde(default)]
    pub provider: ProviderSection,
    /// Translation behavior configuration.
    #[serde(default)]
    pub translation: TranslationSection,
}

impl RelayConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is, in order: the explicit argument, the `LINGUA_RELAY_CONFIG`
    /// environment variable, or `lingua-relay.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path);
        let bytes = fs::read(&resolved).map_err(|err| {
            ConfigError::Io(format!("{}: {err}", resolved.display()))
        })?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::parse(content)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.store.validate()?;
        self.queue.validate()?;
        self.provider.validate()?;
        self.translation.validate()?;
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Bearer token required on every non-health route.
    #[serde(default)]
    pub api_token: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            api_token: String::new(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Returns the bind address parsed as a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("server.bind is not a socket address: {}", self.bind)))
    }

    /// Validates the server section.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.api_token.is_empty() {
            return Err(ConfigError::Invalid("server.api_token must be set".to_string()));
        }
        if self.api_token.len() > MAX_AUTH_TOKEN_LENGTH {
            return Err(ConfigError::Invalid("server.api_token exceeds length limit".to_string()));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Store backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// In-memory store; nothing survives a restart.
    #[default]
    Memory,
    /// Durable `SQLite`-backed store.
    Sqlite,
}

/// Store configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    /// Store backend.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// Database path; required for the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds for the sqlite backend.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteJournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl StoreConfig {
    /// Builds the sqlite store configuration for this section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the section selects sqlite
    /// without a path.
    pub fn sqlite_config(&self) -> Result<SqliteStoreConfig, ConfigError> {
        let Some(path) = &self.path else {
            return Err(ConfigError::Invalid(
                "store.path is required for the sqlite store".to_string(),
            ));
        };
        Ok(SqliteStoreConfig {
            path: path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        })
    }

    /// Validates the store section.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.store_type == StoreType::Sqlite && self.path.is_none() {
            return Err(ConfigError::Invalid(
                "store.path is required for the sqlite store".to_string(),
            ));
        }
        Ok(())
    }
}

/// Task queue configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSection {
    /// Maximum number of buffered tasks.
    #[serde(default = "default_queue_capacity")]
    pub capacity: usize,
    /// Times a task may be redelivered before being dropped.
    #[serde(default = "default_max_redeliveries")]
    pub max_redeliveries: u32,
}

impl Default for QueueSection {
    fn default() -> Self {
        Self {
            capacity: default_queue_capacity(),
            max_redeliveries: default_max_redeliveries(),
        }
    }
}

impl QueueSection {
    /// Validates the queue section.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid(
                "queue.capacity must be greater than zero".to_string(),
            ));
        }
        if self.capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::Invalid("queue.capacity exceeds limit".to_string()));
        }
        if self.max_redeliveries > MAX_REDELIVERIES {
            return Err(ConfigError::Invalid("queue.max_redeliveries exceeds limit".to_string()));
        }
        Ok(())
    }
}

/// Translation provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSection {
    /// Chat-completions endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Inline API key; prefer `api_key_env` outside local development.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum completion tokens per translation.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            api_key_env: default_api_key_env(),
            model: default_model(),
            timeout_ms: default_provider_timeout_ms(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl ProviderSection {
    /// Resolves the provider API key from the inline value or environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no key is available.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = &self.api_key
            && !key.is_empty()
        {
            return Ok(key.clone());
        }
        env::var(&self.api_key_env).map_err(|_| {
            ConfigError::Invalid(format!(
                "provider api key missing: set provider.api_key or the {} environment variable",
                self.api_key_env
            ))
        })
    }

    /// Validates the provider section.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::Invalid("provider.api_url must be an http(s) url".to_string()));
        }
        if self.model.is_empty() {
            return Err(ConfigError::Invalid("provider.model must be set".to_string()));
        }
        if !(MIN_PROVIDER_TIMEOUT_MS..=MAX_PROVIDER_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid("provider.timeout_ms out of range".to_string()));
        }
        if self.max_tokens == 0 || self.max_tokens > MAX_PROVIDER_MAX_TOKENS {
            return Err(ConfigError::Invalid("provider.max_tokens out of range".to_string()));
        }
        Ok(())
    }
}

/// Translation behavior configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationSection {
    /// Language every source value is written in.
    #[serde(default = "default_source_language")]
    pub source_language: String,
}

impl Default for TranslationSection {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
        }
    }
}

impl TranslationSection {
    /// Returns the validated source language code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the code is malformed.
    pub fn language_code(&self) -> Result<LanguageCode, ConfigError> {
        LanguageCode::new(self.source_language.clone())
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Validates the translation section.
    fn validate(&self) -> Result<(), ConfigError> {
        self.language_code().map(|_| ())
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default bind address.
fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Default request body limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Default sqlite busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Default queue capacity.
const fn default_queue_capacity() -> usize {
    256
}

/// Default redelivery bound.
const fn default_max_redeliveries() -> u32 {
    5
}

/// Default chat-completions endpoint.
fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

/// Default API key environment variable.
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Default model identifier.
fn default_model() -> String {
    "gpt-4".to_string()
}

/// Default provider timeout.
const fn default_provider_timeout_ms() -> u64 {
    30_000
}

/// Default completion token bound.
const fn default_max_tokens() -> u32 {
    1_000
}

/// Default source language.
fn default_source_language() -> String {
    "en".to_string()
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Resolves the configuration path from argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    path.map_or_else(
        || {
            env::var(CONFIG_ENV_VAR)
                .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from)
        },
        Path::to_path_buf,
    )
}
