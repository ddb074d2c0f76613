// lingua-relay-core/src/core/mod.rs
// ============================================================================
// Module: Lingua Relay Core Types
// Description: Entities, identifiers, and payloads shared across the workspace.
// Purpose: Group the pure data model separately from interfaces and runtime logic.
// Dependencies: serde, thiserror, uuid
// ============================================================================

//! ## Overview
//! The core data model: request and key entities, typed identifiers, the
//! timestamp representation, and the queue task payload. Nothing here performs
//! I/O or reads the clock.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod key;
pub mod request;
pub mod task;
pub mod time;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use identifiers::IdentifierError;
pub use identifiers::LanguageCode;
pub use identifiers::RequestId;
pub use key::TranslationKey;
pub use request::RequestStatus;
pub use request::TranslationRequest;
pub use task::TranslationTask;
pub use time::Timestamp;
