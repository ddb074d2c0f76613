// lingua-relay-store-sqlite/src/lib.rs
// ============================================================================
// Module: Lingua Relay SQLite Store
// Description: Durable SQLite-backed implementation of the relay store.
// Purpose: Persist requests and translation keys across restarts.
// Dependencies: lingua-relay-core, async-trait, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Durable persistence behind the [`lingua_relay_core::RelayStore`] seam:
//! JSON snapshots in `SQLite` under WAL, with the request status mirrored
//! into an indexed column for the recovery scan. See [`store`] for details.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use store::MAX_SNAPSHOT_BYTES;
pub use store::SqliteJournalMode;
pub use store::SqliteRelayStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteSyncMode;
