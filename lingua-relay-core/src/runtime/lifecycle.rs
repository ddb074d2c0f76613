// lingua-relay-core/src/runtime/lifecycle.rs
// ============================================================================
// Module: Lingua Relay Request Lifecycle
// Description: State machine over requests plus the per-key dedup cache logic.
// Purpose: Own every mutation of request and key records behind one manager.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`LifecycleManager`] is the sole writer of request and key records. It
//! enforces the transition rules (`pending -> processing -> completed |
//! failed | cancelled`, terminal states immutable), computes the pending key
//! set that deduplicates provider calls, assembles translated output for
//! completed requests, and seeds the cache in bulk.
//!
//! Timestamps are always supplied by the caller; this module never reads the
//! clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::core::LanguageCode;
use crate::core::RequestId;
use crate::core::RequestStatus;
use crate::core::Timestamp;
use crate::core::TranslationKey;
use crate::core::TranslationRequest;
use crate::interfaces::RelayStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Lifecycle operation errors.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// No request exists with the given identifier.
    #[error("translation request not found: {0}")]
    RequestNotFound(RequestId),
    /// No translation key exists with the given name.
    #[error("translation key not found: {0}")]
    KeyNotFound(String),
    /// The request is already in a terminal status.
    #[error("translation request {id} is already {status}")]
    StateConflict {
        /// Identifier of the conflicting request.
        id: RequestId,
        /// Terminal status the request is in.
        status: RequestStatus,
    },
    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Bulk Cache Report
// ============================================================================

/// Outcome of a bulk cache-seeding call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheReport {
    /// Keys written to the cache.
    pub cached: usize,
    /// Keys skipped because no source-language text was supplied.
    pub skipped: Vec<String>,
    /// Distinct keys present in the input.
    pub total: usize,
}

// ============================================================================
// SECTION: Lifecycle Manager
// ============================================================================

/// Prefix marking ARB metadata entries that are never translated.
const METADATA_PREFIX: char = '@';

/// Sole writer of request and translation key records.
#[derive(Clone)]
pub struct LifecycleManager {
    /// Backing store, the single source of truth.
    store: Arc<dyn RelayStore>,
}

impl LifecycleManager {
    /// Creates a lifecycle manager over a store.
    #[must_use]
    pub fn new(store: Arc<dyn RelayStore>) -> Self {
        Self {
            store,
        }
    }

    /// Creates and persists a new pending request.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when persistence fails.
    pub async fn create(
        &self,
        source_data: BTreeMap<String, String>,
        languages: Vec<LanguageCode>,
        now: Timestamp,
    ) -> Result<TranslationRequest, LifecycleError> {
        let request = TranslationRequest::new(source_data, languages, now);
        self.store.save_request(&request).await?;
        Ok(request)
    }

    /// Loads a request by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::RequestNotFound`] when absent and
    /// [`LifecycleError::Store`] when the lookup fails.
    pub async fn request(&self, id: &RequestId) -> Result<TranslationRequest, LifecycleError> {
        self.store
            .request(id)
            .await?
            .ok_or_else(|| LifecycleError::RequestNotFound(id.clone()))
    }

    /// Loads a request and rejects terminal ones with a state conflict.
    async fn active_request(&self, id: &RequestId) -> Result<TranslationRequest, LifecycleError> {
        let request = self.request(id).await?;
        if request.is_terminal() {
            return Err(LifecycleError::StateConflict {
                id: id.clone(),
                status: request.status,
            });
        }
        Ok(request)
    }

    /// Transitions a request to `processing`.
    ///
    /// Re-entering `processing` is allowed so redelivered tasks can resume a
    /// request that a crashed consumer left mid-flight.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::StateConflict`] from a terminal status,
    /// [`LifecycleError::RequestNotFound`] when absent, and
    /// [`LifecycleError::Store`] on store failure.
    pub async fn mark_processing(
        &self,
        id: &RequestId,
        now: Timestamp,
    ) -> Result<TranslationRequest, LifecycleError> {
        let mut request = self.active_request(id).await?;
        request.mark_processing(now);
        self.store.save_request(&request).await?;
        Ok(request)
    }

    /// Transitions a request to `completed`, recording the completion time.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::StateConflict`] from a terminal status,
    /// [`LifecycleError::RequestNotFound`] when absent, and
    /// [`LifecycleError::Store`] on store failure.
    pub async fn mark_completed(
        &self,
        id: &RequestId,
        now: Timestamp,
    ) -> Result<TranslationRequest, LifecycleError> {
        let mut request = self.active_request(id).await?;
        request.mark_completed(now);
        self.store.save_request(&request).await?;
        Ok(request)
    }

    /// Transitions a request to `failed`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::StateConflict`] from a terminal status,
    /// [`LifecycleError::RequestNotFound`] when absent, and
    /// [`LifecycleError::Store`] on store failure.
    pub async fn mark_failed(
        &self,
        id: &RequestId,
        now: Timestamp,
    ) -> Result<TranslationRequest, LifecycleError> {
        let mut request = self.active_request(id).await?;
        request.mark_failed(now);
        self.store.save_request(&request).await?;
        Ok(request)
    }

    /// Cancels a request.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::StateConflict`] when already terminal,
    /// [`LifecycleError::RequestNotFound`] when absent, and
    /// [`LifecycleError::Store`] on store failure.
    pub async fn cancel(
        &self,
        id: &RequestId,
        now: Timestamp,
    ) -> Result<TranslationRequest, LifecycleError> {
        let mut request = self.active_request(id).await?;
        request.mark_cancelled(now);
        self.store.save_request(&request).await?;
        Ok(request)
    }

    /// Computes the keys that still need provider calls for a request.
    ///
    /// Metadata entries (names starting with `@`) are skipped. New keys and
    /// keys whose source value changed are persisted immediately (the latter
    /// with their stale cache cleared) and scheduled for every language;
    /// unchanged keys are scheduled only when at least one requested language
    /// is missing from their cache. Fully cached keys produce no work.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when a lookup or save fails.
    pub async fn pending_keys(
        &self,
        source_data: &BTreeMap<String, String>,
        languages: &[LanguageCode],
    ) -> Result<Vec<TranslationKey>, LifecycleError> {
        let mut pending = Vec::new();
        for (name, value) in source_data {
            if name.starts_with(METADATA_PREFIX) {
                continue;
            }
            match self.store.key(name).await? {
                None => {
                    let key = TranslationKey::new(name.clone(), value.clone());
                    self.store.save_key(&key).await?;
                    pending.push(key);
                }
                Some(mut key) => {
                    if key.value == *value {
                        if !key.missing_languages(languages).is_empty() {
                            pending.push(key);
                        }
                    } else {
                        key.update_value(value.clone());
                        self.store.save_key(&key).await?;
                        pending.push(key);
                    }
                }
            }
        }
        Ok(pending)
    }

    /// Persists a translation key snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when persistence fails.
    pub async fn save_key(&self, key: &TranslationKey) -> Result<(), LifecycleError> {
        self.store.save_key(key).await?;
        Ok(())
    }

    /// Assembles the translated output for a request's source data.
    ///
    /// Produces a language-to-key-to-text map covering every requested
    /// language for which a cached translation exists. Metadata entries and
    /// unknown keys are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when a lookup fails.
    pub async fn translated_data_for(
        &self,
        source_data: &BTreeMap<String, String>,
        languages: &[LanguageCode],
    ) -> Result<BTreeMap<LanguageCode, BTreeMap<String, String>>, LifecycleError> {
        let mut data: BTreeMap<LanguageCode, BTreeMap<String, String>> = BTreeMap::new();
        for name in source_data.keys() {
            if name.starts_with(METADATA_PREFIX) {
                continue;
            }
            let Some(key) = self.store.key(name).await? else {
                continue;
            };
            for language in languages {
                if let Some(text) = key.translations.get(language) {
                    data.entry(language.clone()).or_default().insert(name.clone(), text.clone());
                }
            }
        }
        Ok(data)
    }

    /// Lists every request that has not reached a terminal status.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when listing fails.
    pub async fn incomplete_requests(&self) -> Result<Vec<TranslationRequest>, LifecycleError> {
        Ok(self.store.incomplete_requests().await?)
    }

    /// Deletes a translation key and its cached translations.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::KeyNotFound`] when the key does not exist
    /// and [`LifecycleError::Store`] when the store fails.
    pub async fn delete_key(&self, name: &str) -> Result<(), LifecycleError> {
        if !self.store.key_exists(name).await? {
            return Err(LifecycleError::KeyNotFound(name.to_string()));
        }
        self.store.delete_key(name).await?;
        Ok(())
    }

    /// Seeds the cache from a language-to-key-to-text map without calling
    /// the provider.
    ///
    /// Each key must carry a text in `source_language`; that text becomes the
    /// key's source value. Keys without one are skipped and reported. When
    /// the supplied value differs from a stored key's value the stale cache
    /// is cleared before the supplied translations are written.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when a lookup or save fails.
    pub async fn cache_translations(
        &self,
        translations: &BTreeMap<LanguageCode, BTreeMap<String, String>>,
        source_language: &LanguageCode,
    ) -> Result<CacheReport, LifecycleError> {
        let mut by_key: BTreeMap<&str, BTreeMap<&LanguageCode, &str>> = BTreeMap::new();
        for (language, entries) in translations {
            for (name, text) in entries {
                by_key.entry(name).or_default().insert(language, text);
            }
        }

        let mut report = CacheReport {
            total: by_key.len(),
            ..CacheReport::default()
        };
        for (name, texts) in by_key {
            let Some(value) = texts.get(source_language) else {
                report.skipped.push(name.to_string());
                continue;
            };
            let mut key = match self.store.key(name).await? {
                Some(existing) => existing,
                None => TranslationKey::new(name, *value),
            };
            key.update_value(*value);
            for (language, text) in &texts {
                if *language != source_language {
                    key.insert_translation((*language).clone(), *text);
                }
            }
            self.store.save_key(&key).await?;
            report.cached += 1;
        }
        Ok(report)
    }
}
