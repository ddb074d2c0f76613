// lingua-relay-core/src/core/identifiers.rs
// ============================================================================
// Module: Lingua Relay Identifiers
// Description: Typed identifiers for requests and languages.
// Purpose: Prevent accidental mixing of identifier kinds across the API surface.
// Dependencies: serde, thiserror, uuid
// ============================================================================

//! ## Overview
//! Identifiers are opaque newtypes over strings. [`RequestId`] carries no
//! format guarantees beyond what its generator produced; [`LanguageCode`]
//! validates its shape at construction and is the only place that rule lives.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identifier construction errors.
#[derive(Debug, Error)]
pub enum IdentifierError {
    /// Language code failed shape validation.
    #[error("invalid language code: {0:?} (expected 2-3 ASCII letters)")]
    InvalidLanguageCode(String),
}

// ============================================================================
// SECTION: Request Identifier
// ============================================================================

/// Unique identifier for a translation request.
///
/// # Invariants
/// - Immutable for the lifetime of the request.
/// - No validation applied by this type; [`RequestId::generate`] produces
///   UUID v4 strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Creates a request identifier from an existing string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random request identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Language Code
// ============================================================================

/// Target or source language identifier.
///
/// # Invariants
/// - Always 2 or 3 ASCII letters; enforced at construction.
/// - Stored verbatim; no case normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Creates a validated language code.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::InvalidLanguageCode`] when the value is not
    /// 2-3 ASCII letters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        let valid = (2..=3).contains(&value.len())
            && value.chars().all(|ch| ch.is_ascii_alphabetic());
        if valid {
            Ok(Self(value))
        } else {
            Err(IdentifierError::InvalidLanguageCode(value))
        }
    }

    /// Returns the language code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
