// lingua-relay-core/src/core/time.rs
// ============================================================================
// Module: Lingua Relay Time Model
// Description: Canonical timestamp representation for request records.
// Purpose: Keep core logic deterministic by taking time as an explicit input.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Request records embed explicit time values. The core engine never reads
//! wall-clock time directly; callers supply timestamps through the
//! [`crate::interfaces::Clock`] seam, which keeps state transitions replayable
//! in tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp stored on request records.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(value: i64) -> Self {
        Self(value)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }
}
