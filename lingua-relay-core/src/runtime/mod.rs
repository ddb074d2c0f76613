// lingua-relay-core/src/runtime/mod.rs
// ============================================================================
// Module: Lingua Relay Runtime
// Description: Lifecycle manager, task engine, clock, and in-memory store.
// Purpose: Compose core types and interfaces into the relay's behavior.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime logic over the pure data model: the request lifecycle manager,
//! the task processing engine, the system clock, and an in-memory store for
//! tests and demos.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod clock;
pub mod engine;
pub mod lifecycle;
pub mod store;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use clock::SystemClock;
pub use engine::EngineConfig;
pub use engine::EngineError;
pub use engine::RecoveryReport;
pub use engine::TaskEngine;
pub use lifecycle::CacheReport;
pub use lifecycle::LifecycleError;
pub use lifecycle::LifecycleManager;
pub use store::InMemoryRelayStore;
