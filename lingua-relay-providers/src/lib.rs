// lingua-relay-providers/src/lib.rs
// ============================================================================
// Module: Lingua Relay Providers
// Description: Translation provider clients behind the Translator interface.
// Purpose: Supply real and deterministic translators to the composition root.
// Dependencies: lingua-relay-core, async-trait, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! Implementations of [`lingua_relay_core::Translator`]: an OpenAI-compatible
//! chat-completions client for production and a fixed-table translator for
//! demos and tests.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod fixed;
pub mod openai;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use fixed::FixedTranslator;
pub use openai::OpenAiTranslator;
pub use openai::OpenAiTranslatorConfig;
