// lingua-relay-queue/src/consumer.rs
// ============================================================================
// Module: Lingua Relay Consumer Loop
// Description: Drive a task handler over the channel until shutdown.
// Purpose: Centralize the ack-on-success, requeue-on-error delivery discipline.
// Dependencies: crate::queue, tokio, tracing
// ============================================================================

//! ## Overview
//! [`run_consumer`] pulls deliveries off a [`TaskConsumer`] and hands each
//! task to the supplied handler, one at a time. Handler success acks the
//! delivery; handler failure requeues it (subject to the channel's
//! redelivery bound). A `true` value on the shutdown watch channel stops the
//! loop before the next delivery is consumed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;
use std::future::Future;

use lingua_relay_core::TranslationTask;
use tokio::sync::watch;
use tracing::error;
use tracing::info;

use crate::queue::TaskConsumer;

// ============================================================================
// SECTION: Consumer Loop
// ============================================================================

/// Runs the delivery loop until shutdown or channel closure.
pub async fn run_consumer<H, Fut, E>(
    mut consumer: TaskConsumer,
    mut shutdown: watch::Receiver<bool>,
    handler: H,
) where
    H: Fn(TranslationTask) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    if *shutdown.borrow() {
        return;
    }
    loop {
        tokio::select! {
            // Shutdown wins over a ready delivery so stop requests take
            // effect before the next task is pulled.
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            delivery = consumer.recv() => {
                let Some(delivery) = delivery else {
                    break;
                };
                match handler(delivery.task().clone()).await {
                    Ok(()) => delivery.ack(),
                    Err(err) => {
                        error!(
                            request_id = %delivery.task().request_id,
                            attempt = delivery.attempt(),
                            error = %err,
                            "task handler failed; requeueing delivery"
                        );
                        delivery.requeue();
                    }
                }
            }
        }
    }
    info!("task consumer stopped");
}
