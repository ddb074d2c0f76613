// lingua-relay-core/src/runtime/engine.rs
// ============================================================================
// Module: Lingua Relay Task Engine
// Description: Submission, task processing, and startup recovery.
// Purpose: Compose the lifecycle manager, queue, translator, and clock into the processing loop.
// Dependencies: crate::core, crate::interfaces, crate::runtime::lifecycle, tracing
// ============================================================================

//! ## Overview
//! [`TaskEngine`] drives the asynchronous half of the relay: `submit`
//! persists a request and publishes its task, `process_task` performs the
//! sequential translate-and-cache loop for one delivery, and `recover`
//! republishes tasks for requests stranded by a crash.
//!
//! Error posture: failures that invalidate an entire task (store I/O, request
//! lookup) propagate so the queue redelivers; a failure translating one
//! (key, language) pair is logged and absorbed so one bad pair cannot wedge a
//! request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use tracing::warn;

use crate::core::LanguageCode;
use crate::core::RequestId;
use crate::core::RequestStatus;
use crate::core::TranslationRequest;
use crate::core::TranslationTask;
use crate::interfaces::Clock;
use crate::interfaces::QueueError;
use crate::interfaces::TaskQueue;
use crate::interfaces::TranslateQuery;
use crate::interfaces::Translator;
use crate::runtime::lifecycle::LifecycleError;
use crate::runtime::lifecycle::LifecycleManager;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Task engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A lifecycle or store operation failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// The task could not be published; the request was marked failed.
    #[error("task publish failed: {0}")]
    PublishFailed(#[from] QueueError),
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Language every source value is written in.
    pub source_language: LanguageCode,
}

impl EngineConfig {
    /// Creates an engine configuration.
    #[must_use]
    pub const fn new(source_language: LanguageCode) -> Self {
        Self {
            source_language,
        }
    }
}

// ============================================================================
// SECTION: Recovery Report
// ============================================================================

/// Outcome of a startup recovery pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecoveryReport {
    /// Requests whose tasks were republished.
    pub republished: usize,
    /// Requests marked failed because their task could not be republished.
    pub failed: usize,
}

// ============================================================================
// SECTION: Task Engine
// ============================================================================

/// Drives submission, processing, and recovery of translation requests.
#[derive(Clone)]
pub struct TaskEngine {
    /// Lifecycle manager owning all record mutations.
    lifecycle: LifecycleManager,
    /// Producer side of the task channel.
    queue: Arc<dyn TaskQueue>,
    /// External translation provider.
    translator: Arc<dyn Translator>,
    /// Time source for transition timestamps.
    clock: Arc<dyn Clock>,
    /// Engine configuration.
    config: EngineConfig,
}

impl TaskEngine {
    /// Creates a task engine over its collaborators.
    #[must_use]
    pub fn new(
        lifecycle: LifecycleManager,
        queue: Arc<dyn TaskQueue>,
        translator: Arc<dyn Translator>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            lifecycle,
            queue,
            translator,
            clock,
            config,
        }
    }

    /// Returns the lifecycle manager shared with this engine.
    #[must_use]
    pub const fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    /// Returns the engine's time source.
    #[must_use]
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Returns the configured source language.
    #[must_use]
    pub const fn source_language(&self) -> &LanguageCode {
        &self.config.source_language
    }

    /// Creates a pending request and publishes its processing task.
    ///
    /// When publishing fails the request is marked `failed` before the error
    /// is returned, so no request is left pending with no task behind it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PublishFailed`] when the task cannot be
    /// enqueued and [`EngineError::Lifecycle`] when persistence fails.
    pub async fn submit(
        &self,
        source_data: BTreeMap<String, String>,
        languages: Vec<LanguageCode>,
    ) -> Result<TranslationRequest, EngineError> {
        let request = self.lifecycle.create(source_data, languages, self.clock.now()).await?;
        let task = TranslationTask::for_request(&request);
        if let Err(err) = self.queue.publish(&task).await {
            warn!(request_id = %request.id, error = %err, "task publish failed; marking request failed");
            if let Err(store_err) =
                self.lifecycle.mark_failed(&request.id, self.clock.now()).await
            {
                warn!(request_id = %request.id, error = %store_err, "could not mark unpublishable request failed");
            }
            return Err(EngineError::PublishFailed(err));
        }
        info!(request_id = %request.id, languages = request.languages.len(), "translation request submitted");
        Ok(request)
    }

    /// Processes one delivered task to completion, cancellation, or error.
    ///
    /// Duplicate deliveries for requests already in a terminal status are
    /// acknowledged as no-ops. Cancellation is polled before each key and
    /// before each language; observing it stops work immediately without
    /// completing the request. Each key is persisted once, after all its
    /// languages were attempted, so a crash loses at most one key's progress.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Lifecycle`] when a store or lookup failure
    /// makes the task unprocessable; the caller should requeue the delivery.
    pub async fn process_task(&self, task: &TranslationTask) -> Result<(), EngineError> {
        let request = self.lifecycle.request(&task.request_id).await?;
        if request.is_terminal() {
            info!(request_id = %task.request_id, status = %request.status, "skipping task for terminal request");
            return Ok(());
        }

        self.lifecycle.mark_processing(&task.request_id, self.clock.now()).await?;
        let pending = self.lifecycle.pending_keys(&task.source_data, &task.languages).await?;
        info!(request_id = %task.request_id, keys = pending.len(), "processing translation task");

        for mut key in pending {
            if self.is_cancelled(&task.request_id).await? {
                info!(request_id = %task.request_id, "request cancelled; stopping task");
                return Ok(());
            }
            for language in &task.languages {
                if self.is_cancelled(&task.request_id).await? {
                    info!(request_id = %task.request_id, "request cancelled; stopping task");
                    return Ok(());
                }
                if key.has_translation(language) {
                    continue;
                }
                let query = TranslateQuery {
                    text: key.value.clone(),
                    source: self.config.source_language.clone(),
                    target: language.clone(),
                    context_hint: format!("Translation key: {}", key.key),
                };
                match self.translator.translate(&query).await {
                    Ok(raw) => {
                        key.insert_translation(language.clone(), clean_translation(&raw));
                    }
                    Err(err) => {
                        warn!(
                            request_id = %task.request_id,
                            key = %key.key,
                            language = %language,
                            error = %err,
                            "translation failed; pair left for a later request"
                        );
                    }
                }
            }
            self.lifecycle.save_key(&key).await?;
        }

        match self.lifecycle.mark_completed(&task.request_id, self.clock.now()).await {
            Ok(_) => {
                info!(request_id = %task.request_id, "translation task completed");
                Ok(())
            }
            Err(LifecycleError::StateConflict {
                status, ..
            }) => {
                info!(request_id = %task.request_id, %status, "request reached a terminal status during processing");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Republishes tasks for every request stranded in a non-terminal status.
    ///
    /// Requests whose task cannot be republished are marked `failed` so they
    /// do not linger as pending work nothing will ever pick up.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Lifecycle`] when the incomplete-request listing
    /// fails; per-request publish failures are absorbed into the report.
    pub async fn recover(&self) -> Result<RecoveryReport, EngineError> {
        let incomplete = self.lifecycle.incomplete_requests().await?;
        let mut report = RecoveryReport::default();
        for request in incomplete {
            let task = TranslationTask::for_request(&request);
            match self.queue.publish(&task).await {
                Ok(()) => report.republished += 1,
                Err(err) => {
                    warn!(request_id = %request.id, error = %err, "could not republish recovered request; marking failed");
                    if let Err(store_err) =
                        self.lifecycle.mark_failed(&request.id, self.clock.now()).await
                    {
                        warn!(request_id = %request.id, error = %store_err, "could not mark unrecoverable request failed");
                    }
                    report.failed += 1;
                }
            }
        }
        info!(republished = report.republished, failed = report.failed, "startup recovery finished");
        Ok(report)
    }

    /// Reports whether the request has been cancelled.
    async fn is_cancelled(&self, id: &RequestId) -> Result<bool, EngineError> {
        let request = self.lifecycle.request(id).await?;
        Ok(request.status == RequestStatus::Cancelled)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Strips whitespace and wrapping quotes some providers add around output.
fn clean_translation(raw: &str) -> String {
    raw.trim().trim_matches(|ch| ch == '"' || ch == '\'').to_string()
}
