// lingua-relay-server/src/server.rs
// ============================================================================
// Module: Relay Server
// Description: Composition root wiring store, queue, provider, and HTTP surface.
// Purpose: Build the engine from configuration and run it to graceful shutdown.
// Dependencies: axum, lingua-relay-config, lingua-relay-core, lingua-relay-providers, lingua-relay-queue, lingua-relay-store-sqlite, tokio
// ============================================================================

//! ## Overview
//! [`RelayServer::from_config`] assembles the task engine from validated
//! configuration: the chosen store backend, the in-process task channel, the
//! OpenAI-compatible translator, and the system clock. [`RelayServer::serve`]
//! runs startup recovery, spawns the consumer loop, and serves the HTTP API
//! until Ctrl-C, at which point the consumer is signalled to stop before the
//! process exits.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use lingua_relay_config::ConfigError;
use lingua_relay_config::RelayConfig;
use lingua_relay_config::StoreType;
use lingua_relay_core::EngineConfig;
use lingua_relay_core::InMemoryRelayStore;
use lingua_relay_core::LifecycleManager;
use lingua_relay_core::RelayStore;
use lingua_relay_core::SystemClock;
use lingua_relay_core::TaskEngine;
use lingua_relay_providers::OpenAiTranslator;
use lingua_relay_providers::OpenAiTranslatorConfig;
use lingua_relay_queue::QueueConfig;
use lingua_relay_queue::TaskConsumer;
use lingua_relay_queue::run_consumer;
use lingua_relay_queue::task_channel;
use lingua_relay_store_sqlite::SqliteRelayStore;
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;
use tracing::warn;

use crate::routes::AppState;
use crate::routes::router;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server startup and runtime errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration was invalid or incomplete.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// A component could not be initialized.
    #[error("initialization error: {0}")]
    Init(String),
    /// Startup recovery failed.
    #[error("recovery error: {0}")]
    Recovery(String),
    /// Binding or serving the listener failed.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// SECTION: Relay Server
// ============================================================================

/// Assembled relay server, ready to serve.
pub struct RelayServer {
    /// Validated configuration.
    config: RelayConfig,
    /// Task engine shared by the HTTP surface and the consumer loop.
    engine: TaskEngine,
    /// Consumer half of the task channel.
    consumer: TaskConsumer,
}

impl RelayServer {
    /// Builds a relay server from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when required settings are missing and
    /// [`ServerError::Init`] when a backend cannot be constructed.
    pub fn from_config(config: RelayConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let store = build_store(&config)?;
        let lifecycle = LifecycleManager::new(store);

        let queue_config = QueueConfig {
            capacity: config.queue.capacity,
            max_redeliveries: config.queue.max_redeliveries,
        };
        let (queue, consumer) = task_channel(&queue_config);

        let api_key = config.provider.resolve_api_key()?;
        let translator = OpenAiTranslator::new(OpenAiTranslatorConfig {
            api_url: config.provider.api_url.clone(),
            api_key,
            model: config.provider.model.clone(),
            timeout_ms: config.provider.timeout_ms,
            max_tokens: config.provider.max_tokens,
        })
        .map_err(|err| ServerError::Init(err.to_string()))?;

        let engine = TaskEngine::new(
            lifecycle,
            Arc::new(queue),
            Arc::new(translator),
            Arc::new(SystemClock::new()),
            EngineConfig::new(config.translation.language_code()?),
        );
        Ok(Self {
            config,
            engine,
            consumer,
        })
    }

    /// Runs recovery, the consumer loop, and the HTTP listener to completion.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Recovery`] when stranded requests cannot be
    /// listed and [`ServerError::Io`] when the listener fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let report = self
            .engine
            .recover()
            .await
            .map_err(|err| ServerError::Recovery(err.to_string()))?;
        info!(
            republished = report.republished,
            failed = report.failed,
            "startup recovery complete"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handler_engine = self.engine.clone();
        let consumer_handle = tokio::spawn(run_consumer(self.consumer, shutdown_rx, move |task| {
            let engine = handler_engine.clone();
            async move { engine.process_task(&task).await }
        }));

        let addr = self.config.server.bind_addr()?;
        let state = AppState::new(self.engine, &self.config.server.api_token);
        let app = router(state, self.config.server.max_body_bytes);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "relay server listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown_tx))
            .await?;

        if consumer_handle.await.is_err() {
            warn!("consumer task ended abnormally");
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the configured store backend.
fn build_store(config: &RelayConfig) -> Result<Arc<dyn RelayStore>, ServerError> {
    let store: Arc<dyn RelayStore> = match config.store.store_type {
        StoreType::Memory => Arc::new(InMemoryRelayStore::new()),
        StoreType::Sqlite => {
            let sqlite_config = config.store.sqlite_config()?;
            Arc::new(
                SqliteRelayStore::new(&sqlite_config)
                    .map_err(|err| ServerError::Init(err.to_string()))?,
            )
        }
    };
    Ok(store)
}

/// Waits for Ctrl-C, then signals the consumer loop to stop.
async fn shutdown_signal(shutdown: watch::Sender<bool>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for shutdown signal");
    }
    info!("shutdown signal received; draining");
    if shutdown.send(true).is_err() {
        warn!("consumer loop already stopped");
    }
}
