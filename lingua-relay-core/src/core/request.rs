// lingua-relay-core/src/core/request.rs
// ============================================================================
// Module: Lingua Relay Request Entity
// Description: Translation request record and its status machine.
// Purpose: Model the lifecycle of an asynchronous translation request.
// Dependencies: crate::core::identifiers, crate::core::time, serde
// ============================================================================

//! ## Overview
//! A [`TranslationRequest`] tracks one submitted batch of source entries and
//! target languages through `pending -> processing -> completed | failed |
//! cancelled`. Entity methods apply transitions and refresh `updated_at`; they
//! do not guard against leaving a terminal state. That guard belongs to the
//! lifecycle manager, which is the sole writer of request records.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::LanguageCode;
use crate::core::identifiers::RequestId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Request Status
// ============================================================================

/// Lifecycle status of a translation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Accepted and queued; no work performed yet.
    Pending,
    /// A consumer is (or was) actively working the request.
    Processing,
    /// All pending work finished; terminal.
    Completed,
    /// The request was abandoned after an unrecoverable error; terminal.
    Failed,
    /// The caller withdrew the request; terminal.
    Cancelled,
}

impl RequestStatus {
    /// Returns true when no further transition may leave this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Returns the canonical lowercase status name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Request Entity
// ============================================================================

/// One submitted translation request.
///
/// # Invariants
/// - `id` is immutable after construction.
/// - Every status transition refreshes `updated_at`.
/// - `completed_at` is set exactly once, on the transition into
///   [`RequestStatus::Completed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Unique request identifier.
    pub id: RequestId,
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// Source-language entries keyed by translation key name.
    pub source_data: BTreeMap<String, String>,
    /// Requested target languages.
    pub languages: Vec<LanguageCode>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Time of the most recent mutation.
    pub updated_at: Timestamp,
    /// Completion time, present only for completed requests.
    pub completed_at: Option<Timestamp>,
}

impl TranslationRequest {
    /// Creates a new pending request with a generated identifier.
    #[must_use]
    pub fn new(
        source_data: BTreeMap<String, String>,
        languages: Vec<LanguageCode>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: RequestId::generate(),
            status: RequestStatus::Pending,
            source_data,
            languages,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Returns true when the request is in a terminal status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Marks the request as being worked on.
    pub fn mark_processing(&mut self, now: Timestamp) {
        self.status = RequestStatus::Processing;
        self.updated_at = now;
    }

    /// Marks the request as completed and records the completion time.
    pub fn mark_completed(&mut self, now: Timestamp) {
        self.status = RequestStatus::Completed;
        self.updated_at = now;
        self.completed_at = Some(now);
    }

    /// Marks the request as failed.
    pub fn mark_failed(&mut self, now: Timestamp) {
        self.status = RequestStatus::Failed;
        self.updated_at = now;
    }

    /// Marks the request as cancelled.
    pub fn mark_cancelled(&mut self, now: Timestamp) {
        self.status = RequestStatus::Cancelled;
        self.updated_at = now;
    }
}
