// lingua-relay-server/src/lib.rs
// ============================================================================
// Module: Lingua Relay Server
// Description: HTTP surface and composition root for the translation relay.
// Purpose: Expose the relay over REST and run the asynchronous processing loop.
// Dependencies: axum, lingua-relay-config, lingua-relay-core, lingua-relay-providers, lingua-relay-queue, lingua-relay-store-sqlite, subtle, tokio
// ============================================================================

//! ## Overview
//! The server crate ties the workspace together: [`server::RelayServer`]
//! builds the engine from configuration and runs it, [`routes`] defines the
//! REST API under `/api/v1`, and [`auth`] enforces bearer authentication on
//! every route except the health probe.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod routes;
pub mod server;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use routes::AppState;
pub use routes::router;
pub use server::RelayServer;
pub use server::ServerError;
