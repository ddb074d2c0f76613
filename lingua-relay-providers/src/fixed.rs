// lingua-relay-providers/src/fixed.rs
// ============================================================================
// Module: Fixed-Table Translator
// Description: Deterministic translator backed by a static lookup table.
// Purpose: Support demos and integration tests without a network provider.
// Dependencies: lingua-relay-core
// ============================================================================

//! ## Overview
//! [`FixedTranslator`] resolves translations from an in-memory table keyed
//! by (source text, target language). Unknown pairs fail with
//! [`TranslateError::Api`], which exercises the engine's partial-failure
//! path the same way a real provider outage would.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;
use lingua_relay_core::LanguageCode;
use lingua_relay_core::TranslateError;
use lingua_relay_core::TranslateQuery;
use lingua_relay_core::Translator;

// ============================================================================
// SECTION: Fixed Translator
// ============================================================================

/// Translator resolving from a fixed (text, language) table.
#[derive(Debug, Default, Clone)]
pub struct FixedTranslator {
    /// Translations keyed by source text and target language.
    entries: BTreeMap<(String, LanguageCode), String>,
}

impl FixedTranslator {
    /// Creates an empty fixed translator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds one translation to the table.
    #[must_use]
    pub fn with_entry(
        mut self,
        text: impl Into<String>,
        target: LanguageCode,
        translated: impl Into<String>,
    ) -> Self {
        self.entries.insert((text.into(), target), translated.into());
        self
    }
}

#[async_trait]
impl Translator for FixedTranslator {
    async fn translate(&self, query: &TranslateQuery) -> Result<String, TranslateError> {
        self.entries
            .get(&(query.text.clone(), query.target.clone()))
            .cloned()
            .ok_or_else(|| {
                TranslateError::Api(format!(
                    "no fixed translation for '{}' into {}",
                    query.text, query.target
                ))
            })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions and helpers are permitted."
    )]

    use super::*;

    fn lang(code: &str) -> LanguageCode {
        LanguageCode::new(code).unwrap()
    }

    #[tokio::test]
    async fn known_pairs_resolve() {
        let translator =
            FixedTranslator::new().with_entry("My App", lang("es"), "Mi Aplicación");
        let query = TranslateQuery {
            text: "My App".to_string(),
            source: lang("en"),
            target: lang("es"),
            context_hint: String::new(),
        };
        assert_eq!(translator.translate(&query).await.unwrap(), "Mi Aplicación");
    }

    #[tokio::test]
    async fn unknown_pairs_fail() {
        let translator = FixedTranslator::new();
        let query = TranslateQuery {
            text: "My App".to_string(),
            source: lang("en"),
            target: lang("fr"),
            context_hint: String::new(),
        };
        assert!(matches!(
            translator.translate(&query).await,
            Err(TranslateError::Api(_))
        ));
    }
}
