// lingua-relay-queue/src/lib.rs
// ============================================================================
// Module: Lingua Relay Queue
// Description: In-process at-least-once task channel and consumer loop.
// Purpose: Carry translation tasks from submission to processing.
// Dependencies: lingua-relay-core, async-trait, tokio, tracing
// ============================================================================

//! ## Overview
//! This crate implements the task channel behind the
//! [`lingua_relay_core::TaskQueue`] seam: a bounded in-process channel with
//! explicit ack/requeue and an attempt counter, plus [`run_consumer`], the
//! loop the server spawns to drain it. A broker-backed implementation would
//! replace this crate without touching the core.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod consumer;
pub mod queue;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use consumer::run_consumer;
pub use queue::InProcessTaskQueue;
pub use queue::QueueConfig;
pub use queue::TaskConsumer;
pub use queue::TaskDelivery;
pub use queue::task_channel;
