// lingua-relay-server/src/auth.rs
// ============================================================================
// Module: Server Authentication
// Description: Bearer token enforcement for the relay HTTP API.
// Purpose: Reject unauthenticated requests before any handler runs.
// Dependencies: axum, subtle
// ============================================================================

//! ## Overview
//! Bearer token middleware for every route except the health probe. Token
//! comparison is constant-time to keep timing side-channels out of the
//! authentication path. Missing, malformed, and wrong credentials all map to
//! the same `401` so callers cannot probe which part failed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use subtle::ConstantTimeEq;

use crate::routes::AppState;
use crate::routes::error_body;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Upper bound on the Authorization header before it is inspected.
const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

/// Scheme prefix expected on the Authorization header.
const BEARER_PREFIX: &str = "Bearer ";

// ============================================================================
// SECTION: Constant-Time Comparison
// ============================================================================

/// Compares two byte slices in constant time.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Compares two strings in constant time.
#[must_use]
pub fn constant_time_eq_str(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Enforces bearer authentication for one request.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    match presented_token(request.headers()) {
        Some(token) if constant_time_eq_str(token, state.api_token()) => next.run(request).await,
        _ => error_body(StatusCode::UNAUTHORIZED, "invalid or missing bearer token")
            .into_response(),
    }
}

/// Extracts the bearer token from the Authorization header, if well-formed.
fn presented_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return None;
    }
    header.strip_prefix(BEARER_PREFIX).map(str::trim)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
