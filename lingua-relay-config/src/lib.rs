// lingua-relay-config/src/lib.rs
// ============================================================================
// Module: Lingua Relay Config
// Description: TOML configuration for the relay server.
// Purpose: Centralize fail-closed configuration loading and validation.
// Dependencies: lingua-relay-core, lingua-relay-store-sqlite, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration for the relay server, loaded from TOML with fail-closed
//! validation. See [`config`] for the section types and resolution rules.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::ProviderSection;
pub use config::QueueSection;
pub use config::RelayConfig;
pub use config::ServerConfig;
pub use config::StoreConfig;
pub use config::StoreType;
pub use config::TranslationSection;
