// lingua-relay-core/src/core/task.rs
// ============================================================================
// Module: Lingua Relay Task Payload
// Description: Queue message describing one unit of translation work.
// Purpose: Carry everything a consumer needs to process a request without extra lookups.
// Dependencies: crate::core::identifiers, crate::core::request, serde
// ============================================================================

//! ## Overview
//! A [`TranslationTask`] is the payload published to the task channel when a
//! request is submitted or recovered. It snapshots the request's source data
//! and languages; the authoritative status still lives in the store and is
//! re-checked by the consumer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::LanguageCode;
use crate::core::identifiers::RequestId;
use crate::core::request::TranslationRequest;

// ============================================================================
// SECTION: Task Payload
// ============================================================================

/// Queue message for one translation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationTask {
    /// Identifier of the request to process.
    pub request_id: RequestId,
    /// Source-language entries keyed by translation key name.
    pub source_data: BTreeMap<String, String>,
    /// Requested target languages.
    pub languages: Vec<LanguageCode>,
}

impl TranslationTask {
    /// Builds the task payload for a request.
    #[must_use]
    pub fn for_request(request: &TranslationRequest) -> Self {
        Self {
            request_id: request.id.clone(),
            source_data: request.source_data.clone(),
            languages: request.languages.clone(),
        }
    }
}
