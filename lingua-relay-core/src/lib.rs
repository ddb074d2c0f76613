// lingua-relay-core/src/lib.rs
// ============================================================================
// Module: Lingua Relay Core
// Description: Entities, interfaces, and runtime logic for the translation relay.
// Purpose: Provide the backend-agnostic heart of the Lingua Relay workspace.
// Dependencies: async-trait, serde, thiserror, tracing, uuid
// ============================================================================

//! ## Overview
//! Lingua Relay accepts batches of source-language entries plus target
//! languages and translates them asynchronously. This crate holds the data
//! model ([`core`]), the backend seams ([`interfaces`]), and the behavior
//! composed over them ([`runtime`]): the request lifecycle state machine,
//! the per-key dedup cache, the task processing engine, and startup recovery.
//!
//! Backends (queue, provider, durable store, HTTP surface) live in sibling
//! crates and plug in through the interfaces defined here.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use core::IdentifierError;
pub use core::LanguageCode;
pub use core::RequestId;
pub use core::RequestStatus;
pub use core::Timestamp;
pub use core::TranslationKey;
pub use core::TranslationRequest;
pub use core::TranslationTask;
pub use interfaces::Clock;
pub use interfaces::QueueError;
pub use interfaces::RelayStore;
pub use interfaces::StoreError;
pub use interfaces::TaskQueue;
pub use interfaces::TranslateError;
pub use interfaces::TranslateQuery;
pub use interfaces::Translator;
pub use runtime::CacheReport;
pub use runtime::EngineConfig;
pub use runtime::EngineError;
pub use runtime::InMemoryRelayStore;
pub use runtime::LifecycleError;
pub use runtime::LifecycleManager;
pub use runtime::RecoveryReport;
pub use runtime::SystemClock;
pub use runtime::TaskEngine;
