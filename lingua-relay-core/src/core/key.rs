// lingua-relay-core/src/core/key.rs
// ============================================================================
// Module: Lingua Relay Key Entity
// Description: Globally shared translation key with its cached translations.
// Purpose: Model the per-key translation cache that deduplicates provider calls.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A [`TranslationKey`] is shared across every request that mentions the same
//! key name. Its cached translations always correspond to the current source
//! `value`: updating the value through [`TranslationKey::update_value`] clears
//! the cache so stale text can never be served for new source content.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::LanguageCode;

// ============================================================================
// SECTION: Key Entity
// ============================================================================

/// One translation key and its cached translations.
///
/// # Invariants
/// - `key` is globally unique and immutable.
/// - Every cached translation was produced from the current `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationKey {
    /// Globally unique key name.
    pub key: String,
    /// Current source-language text.
    pub value: String,
    /// Cached translations by target language.
    pub translations: BTreeMap<LanguageCode, String>,
}

impl TranslationKey {
    /// Creates a new key with no cached translations.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            translations: BTreeMap::new(),
        }
    }

    /// Replaces the source value, clearing cached translations when it changed.
    pub fn update_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        if self.value != value {
            self.value = value;
            self.translations.clear();
        }
    }

    /// Returns true when a translation is cached for the language.
    #[must_use]
    pub fn has_translation(&self, language: &LanguageCode) -> bool {
        self.translations.contains_key(language)
    }

    /// Caches a translation for the language, replacing any previous text.
    pub fn insert_translation(&mut self, language: LanguageCode, text: impl Into<String>) {
        self.translations.insert(language, text.into());
    }

    /// Returns the requested languages that are not cached yet.
    #[must_use]
    pub fn missing_languages(&self, requested: &[LanguageCode]) -> Vec<LanguageCode> {
        requested
            .iter()
            .filter(|language| !self.has_translation(language))
            .cloned()
            .collect()
    }
}
