// lingua-relay-core/src/runtime/store.rs
// ============================================================================
// Module: Lingua Relay In-Memory Store
// Description: Simple in-memory relay store for tests and demos.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of [`RelayStore`]
//! for tests, local demos, and the `memory` store type. It is not intended
//! for production use: nothing survives a restart, so recovery always finds
//! an empty store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::RequestId;
use crate::core::TranslationKey;
use crate::core::TranslationRequest;
use crate::interfaces::RelayStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory relay store for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRelayStore {
    /// Request map keyed by request id, protected by a mutex.
    requests: Arc<Mutex<BTreeMap<String, TranslationRequest>>>,
    /// Translation key map keyed by key name, protected by a mutex.
    keys: Arc<Mutex<BTreeMap<String, TranslationKey>>>,
}

impl InMemoryRelayStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(BTreeMap::new())),
            keys: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

/// Maps a poisoned-mutex failure into a store error.
fn poisoned() -> StoreError {
    StoreError::Store("relay store mutex poisoned".to_string())
}

#[async_trait]
impl RelayStore for InMemoryRelayStore {
    async fn save_request(&self, request: &TranslationRequest) -> Result<(), StoreError> {
        self.requests
            .lock()
            .map_err(|_| poisoned())?
            .insert(request.id.as_str().to_string(), request.clone());
        Ok(())
    }

    async fn request(&self, id: &RequestId) -> Result<Option<TranslationRequest>, StoreError> {
        let guard = self.requests.lock().map_err(|_| poisoned())?;
        Ok(guard.get(id.as_str()).cloned())
    }

    async fn incomplete_requests(&self) -> Result<Vec<TranslationRequest>, StoreError> {
        let guard = self.requests.lock().map_err(|_| poisoned())?;
        Ok(guard.values().filter(|request| !request.is_terminal()).cloned().collect())
    }

    async fn save_key(&self, key: &TranslationKey) -> Result<(), StoreError> {
        self.keys.lock().map_err(|_| poisoned())?.insert(key.key.clone(), key.clone());
        Ok(())
    }

    async fn key(&self, name: &str) -> Result<Option<TranslationKey>, StoreError> {
        let guard = self.keys.lock().map_err(|_| poisoned())?;
        Ok(guard.get(name).cloned())
    }

    async fn all_keys(&self) -> Result<Vec<TranslationKey>, StoreError> {
        let guard = self.keys.lock().map_err(|_| poisoned())?;
        Ok(guard.values().cloned().collect())
    }

    async fn key_exists(&self, name: &str) -> Result<bool, StoreError> {
        let guard = self.keys.lock().map_err(|_| poisoned())?;
        Ok(guard.contains_key(name))
    }

    async fn delete_key(&self, name: &str) -> Result<(), StoreError> {
        self.keys.lock().map_err(|_| poisoned())?.remove(name);
        Ok(())
    }
}
