// lingua-relay-queue/src/queue.rs
// ============================================================================
// Module: Lingua Relay Task Channel
// Description: In-process at-least-once task channel over a Tokio mpsc channel.
// Purpose: Deliver translation tasks with explicit ack/requeue and bounded redelivery.
// Dependencies: lingua-relay-core, tokio, tracing
// ============================================================================

//! ## Overview
//! The task channel carries [`TranslationTask`] messages from the HTTP
//! surface to the consumer loop with at-least-once semantics: every delivery
//! must be explicitly acknowledged via [`TaskDelivery::ack`] or returned via
//! [`TaskDelivery::requeue`]. Requeued messages carry an attempt counter;
//! a message is dropped with a warning once `max_redeliveries` is exhausted
//! or when no channel slot is free to take it back.
//!
//! Dropping a delivery without calling either method loses the message; the
//! consumer loop in [`crate::consumer`] never does.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use lingua_relay_core::QueueError;
use lingua_relay_core::TaskQueue;
use lingua_relay_core::TranslationTask;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default channel capacity.
const DEFAULT_CAPACITY: usize = 256;

/// Default redelivery bound.
const DEFAULT_MAX_REDELIVERIES: u32 = 5;

/// Task channel configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Maximum number of buffered tasks.
    pub capacity: usize,
    /// Times a message may be redelivered before being dropped.
    pub max_redeliveries: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_redeliveries: DEFAULT_MAX_REDELIVERIES,
        }
    }
}

// ============================================================================
// SECTION: Channel Construction
// ============================================================================

/// Internal message envelope carrying the redelivery counter.
#[derive(Debug)]
struct QueueMessage {
    /// Task payload.
    task: TranslationTask,
    /// Zero-based delivery attempt.
    attempt: u32,
}

/// Creates a connected producer/consumer pair.
#[must_use]
pub fn task_channel(config: &QueueConfig) -> (InProcessTaskQueue, TaskConsumer) {
    let (sender, receiver) = mpsc::channel(config.capacity);
    let queue = InProcessTaskQueue {
        sender: sender.clone(),
    };
    let consumer = TaskConsumer {
        receiver,
        redeliver: sender,
        max_redeliveries: config.max_redeliveries,
    };
    (queue, consumer)
}

// ============================================================================
// SECTION: Producer
// ============================================================================

/// Producer half of the in-process task channel.
#[derive(Debug, Clone)]
pub struct InProcessTaskQueue {
    /// Sender feeding the channel.
    sender: mpsc::Sender<QueueMessage>,
}

#[async_trait]
impl TaskQueue for InProcessTaskQueue {
    async fn publish(&self, task: &TranslationTask) -> Result<(), QueueError> {
        let message = QueueMessage {
            task: task.clone(),
            attempt: 0,
        };
        self.sender.try_send(message).map_err(|err| match err {
            TrySendError::Full(_) => QueueError::Full,
            TrySendError::Closed(_) => QueueError::Closed,
        })
    }
}

// ============================================================================
// SECTION: Consumer
// ============================================================================

/// Consumer half of the in-process task channel.
#[derive(Debug)]
pub struct TaskConsumer {
    /// Receiver draining the channel.
    receiver: mpsc::Receiver<QueueMessage>,
    /// Sender used to put requeued messages back on the channel.
    redeliver: mpsc::Sender<QueueMessage>,
    /// Times a message may be redelivered before being dropped.
    max_redeliveries: u32,
}

impl TaskConsumer {
    /// Receives the next delivery, or `None` once the channel is closed and
    /// drained.
    pub async fn recv(&mut self) -> Option<TaskDelivery> {
        let message = self.receiver.recv().await?;
        Some(TaskDelivery {
            message,
            redeliver: self.redeliver.clone(),
            max_redeliveries: self.max_redeliveries,
        })
    }
}

/// One delivered task awaiting ack or requeue.
#[derive(Debug)]
pub struct TaskDelivery {
    /// Delivered envelope.
    message: QueueMessage,
    /// Sender used to put the message back on the channel.
    redeliver: mpsc::Sender<QueueMessage>,
    /// Times the message may be redelivered before being dropped.
    max_redeliveries: u32,
}

impl TaskDelivery {
    /// Returns the delivered task.
    #[must_use]
    pub const fn task(&self) -> &TranslationTask {
        &self.message.task
    }

    /// Returns the zero-based delivery attempt.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.message.attempt
    }

    /// Acknowledges the delivery, removing the message from the channel.
    pub fn ack(self) {}

    /// Returns the message to the channel for redelivery.
    ///
    /// Returns `false` when the message was dropped instead: the redelivery
    /// bound was exhausted, the channel is gone, or the channel is full.
    /// Redelivery never waits for capacity — the only task that frees slots
    /// is the consumer calling this.
    pub fn requeue(self) -> bool {
        let request_id = self.message.task.request_id.clone();
        if self.message.attempt >= self.max_redeliveries {
            warn!(
                request_id = %request_id,
                attempts = self.message.attempt + 1,
                "dropping task after exhausting redeliveries"
            );
            return false;
        }
        let message = QueueMessage {
            task: self.message.task,
            attempt: self.message.attempt + 1,
        };
        match self.redeliver.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(request_id = %request_id, "task channel full; dropping requeued task");
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!(request_id = %request_id, "task channel closed; dropping requeued task");
                false
            }
        }
    }
}
