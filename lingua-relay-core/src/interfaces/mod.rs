// lingua-relay-core/src/interfaces/mod.rs
// ============================================================================
// Module: Lingua Relay Interfaces
// Description: Backend-agnostic interfaces for storage, queuing, translation, and time.
// Purpose: Define the contract surfaces the runtime composes over.
// Dependencies: crate::core, async-trait, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the relay integrates with external systems without
//! embedding backend-specific details. The store is the single source of
//! truth; implementations must distinguish "absent" from "failed" and fail
//! closed on corrupt or incompatible data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::core::LanguageCode;
use crate::core::RequestId;
use crate::core::Timestamp;
use crate::core::TranslationKey;
use crate::core::TranslationRequest;
use crate::core::TranslationTask;

// ============================================================================
// SECTION: Relay Store
// ============================================================================

/// Relay store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("relay store io error: {0}")]
    Io(String),
    /// Entity snapshot failed to serialize or deserialize.
    #[error("relay store serialization error: {0}")]
    Serialization(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("relay store corruption: {0}")]
    Corrupt(String),
    /// Store schema version is incompatible.
    #[error("relay store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store reported an error.
    #[error("relay store error: {0}")]
    Store(String),
}

/// Persistence for requests and translation keys.
///
/// Absent entities are reported as `Ok(None)` (or `Ok(false)`), never as
/// errors; errors mean the lookup itself failed.
#[async_trait]
pub trait RelayStore: Send + Sync {
    /// Saves or replaces a request snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when saving fails.
    async fn save_request(&self, request: &TranslationRequest) -> Result<(), StoreError>;

    /// Loads a request by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    async fn request(&self, id: &RequestId) -> Result<Option<TranslationRequest>, StoreError>;

    /// Lists every request whose status is not terminal.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when listing fails.
    async fn incomplete_requests(&self) -> Result<Vec<TranslationRequest>, StoreError>;

    /// Saves or replaces a translation key snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when saving fails.
    async fn save_key(&self, key: &TranslationKey) -> Result<(), StoreError>;

    /// Loads a translation key by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    async fn key(&self, name: &str) -> Result<Option<TranslationKey>, StoreError>;

    /// Lists every stored translation key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when listing fails.
    async fn all_keys(&self) -> Result<Vec<TranslationKey>, StoreError>;

    /// Reports whether a translation key exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    async fn key_exists(&self, name: &str) -> Result<bool, StoreError>;

    /// Deletes a translation key and all its cached translations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when deletion fails.
    async fn delete_key(&self, name: &str) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Task Queue
// ============================================================================

/// Task queue errors.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue is no longer accepting messages.
    #[error("task queue closed")]
    Closed,
    /// The queue is at capacity.
    #[error("task queue full")]
    Full,
}

/// Producer side of the at-least-once task channel.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Publishes a task for asynchronous processing.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError`] when the message cannot be enqueued.
    async fn publish(&self, task: &TranslationTask) -> Result<(), QueueError>;
}

// ============================================================================
// SECTION: Translator
// ============================================================================

/// One translation to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateQuery {
    /// Source-language text to translate.
    pub text: String,
    /// Language the text is written in.
    pub source: LanguageCode,
    /// Language to translate into.
    pub target: LanguageCode,
    /// Free-form hint describing where the text is used.
    pub context_hint: String,
}

/// Translator errors.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Transport-level failure talking to the provider.
    #[error("translator transport error: {0}")]
    Http(String),
    /// The provider answered with an error.
    #[error("translator api error: {0}")]
    Api(String),
    /// The provider answered without any translation content.
    #[error("translator returned no content")]
    Empty,
}

/// External translation provider.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates one text into one target language.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError`] when the provider cannot produce a
    /// translation.
    async fn translate(&self, query: &TranslateQuery) -> Result<String, TranslateError>;
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Wall-clock seam; the core never reads time directly.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}
