// lingua-relay-server/src/routes.rs
// ============================================================================
// Module: HTTP Routes
// Description: REST surface over the translation request lifecycle.
// Purpose: Map HTTP requests onto engine and lifecycle operations.
// Dependencies: axum, lingua-relay-core, serde, tracing
// ============================================================================

//! ## Overview
//! The relay API lives under `/api/v1`. The health probe is public; every
//! other route requires bearer authentication. Handlers translate between
//! JSON bodies and the engine's types and map domain errors onto HTTP
//! statuses: unknown entities are `404`, terminal-state conflicts are `409`,
//! malformed input is `400`, and store failures are an opaque `500`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use lingua_relay_core::EngineError;
use lingua_relay_core::IdentifierError;
use lingua_relay_core::LanguageCode;
use lingua_relay_core::LifecycleError;
use lingua_relay_core::RequestId;
use lingua_relay_core::RequestStatus;
use lingua_relay_core::TaskEngine;
use lingua_relay_core::TranslationRequest;
use serde::Deserialize;
use serde::Serialize;
use tracing::error;

use crate::auth::require_bearer;

// ============================================================================
// SECTION: Application State
// ============================================================================

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Engine driving submission, lookup, and cancellation.
    engine: TaskEngine,
    /// Bearer token required on authenticated routes.
    api_token: Arc<str>,
}

impl AppState {
    /// Creates the application state.
    #[must_use]
    pub fn new(engine: TaskEngine, api_token: &str) -> Self {
        Self {
            engine,
            api_token: Arc::from(api_token),
        }
    }

    /// Returns the configured bearer token.
    #[must_use]
    pub fn api_token(&self) -> &str {
        &self.api_token
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Health probe response.
#[derive(Debug, Serialize)]
struct HealthView {
    /// Fixed readiness marker.
    status: &'static str,
}

/// Submission request body.
#[derive(Debug, Deserialize)]
struct SubmitBody {
    /// Source-language entries keyed by translation key name.
    source_data: BTreeMap<String, String>,
    /// Target language codes to translate into.
    target_languages: Vec<String>,
}

/// Translation request as returned to callers.
#[derive(Debug, Serialize)]
struct RequestView {
    /// Request identifier.
    id: String,
    /// Current lifecycle status.
    status: RequestStatus,
    /// Requested target languages.
    target_languages: Vec<String>,
    /// Creation time in unix milliseconds.
    created_at: i64,
    /// Last transition time in unix milliseconds.
    updated_at: i64,
    /// Completion time in unix milliseconds, once completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<i64>,
    /// Translated output per language, present on completed requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    translated_data: Option<BTreeMap<LanguageCode, BTreeMap<String, String>>>,
}

impl RequestView {
    /// Builds a view from a request record and optional translated output.
    fn from_request(
        request: TranslationRequest,
        translated_data: Option<BTreeMap<LanguageCode, BTreeMap<String, String>>>,
    ) -> Self {
        Self {
            id: request.id.to_string(),
            status: request.status,
            target_languages: request
                .languages
                .iter()
                .map(|language| language.as_str().to_string())
                .collect(),
            created_at: request.created_at.as_unix_millis(),
            updated_at: request.updated_at.as_unix_millis(),
            completed_at: request.completed_at.map(|at| at.as_unix_millis()),
            translated_data,
        }
    }
}

/// Bulk cache-seeding request body.
#[derive(Debug, Deserialize)]
struct CacheBody {
    /// Language-to-key-to-text map to write into the cache.
    translations: BTreeMap<String, BTreeMap<String, String>>,
}

/// Bulk cache-seeding response.
#[derive(Debug, Serialize)]
struct CacheView {
    /// Keys written to the cache.
    cached: usize,
    /// Keys skipped because no source-language text was supplied.
    skipped: Vec<String>,
    /// Distinct keys present in the input.
    total: usize,
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Human-readable error description.
    error: String,
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// HTTP-facing error carrying a status and a caller-safe message.
#[derive(Debug)]
pub struct ApiError {
    /// Response status code.
    status: StatusCode,
    /// Caller-safe message.
    message: String,
}

impl ApiError {
    /// Creates a `400 Bad Request` error.
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_body(self.status, self.message).into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::RequestNotFound(_) | LifecycleError::KeyNotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            LifecycleError::StateConflict {
                ..
            } => Self {
                status: StatusCode::CONFLICT,
                message: err.to_string(),
            },
            LifecycleError::Store(store_err) => {
                error!(error = %store_err, "store failure while serving request");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "internal storage error".to_string(),
                }
            }
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Lifecycle(inner) => inner.into(),
            EngineError::PublishFailed(queue_err) => {
                error!(error = %queue_err, "task publish failed while serving request");
                Self {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    message: "translation queue unavailable".to_string(),
                }
            }
        }
    }
}

impl From<IdentifierError> for ApiError {
    fn from(err: IdentifierError) -> Self {
        Self::bad_request(err.to_string())
    }
}

/// Builds a JSON error response for the given status.
pub(crate) fn error_body(status: StatusCode, message: impl Into<String>) -> impl IntoResponse {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Reports service liveness. Public, no authentication.
async fn health() -> Json<HealthView> {
    Json(HealthView {
        status: "ok",
    })
}

/// Accepts a translation request and queues its processing task.
async fn submit_request(
    State(state): State<AppState>,
    Json(body): Json<SubmitBody>,
) -> Result<(StatusCode, Json<RequestView>), ApiError> {
    if body.source_data.is_empty() {
        return Err(ApiError::bad_request("source_data must not be empty"));
    }
    if body.target_languages.is_empty() {
        return Err(ApiError::bad_request("target_languages must not be empty"));
    }
    let languages = parse_languages(&body.target_languages)?;
    let request = state.engine.submit(body.source_data, languages).await?;
    Ok((StatusCode::CREATED, Json(RequestView::from_request(request, None))))
}

/// Lists every request still awaiting processing or completion.
async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<RequestView>>, ApiError> {
    let incomplete = state.engine.lifecycle().incomplete_requests().await?;
    let views = incomplete
        .into_iter()
        .map(|request| RequestView::from_request(request, None))
        .collect();
    Ok(Json(views))
}

/// Returns one request, including translated output once completed.
async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RequestView>, ApiError> {
    let request_id = RequestId::new(id);
    let request = state.engine.lifecycle().request(&request_id).await?;
    let translated_data = if request.status == RequestStatus::Completed {
        Some(
            state
                .engine
                .lifecycle()
                .translated_data_for(&request.source_data, &request.languages)
                .await?,
        )
    } else {
        None
    };
    Ok(Json(RequestView::from_request(request, translated_data)))
}

/// Cancels a request that has not yet reached a terminal status.
async fn cancel_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RequestView>, ApiError> {
    let request_id = RequestId::new(id);
    let now = state.engine.clock().now();
    let request = state.engine.lifecycle().cancel(&request_id, now).await?;
    Ok(Json(RequestView::from_request(request, None)))
}

/// Deletes a translation key and its cached translations.
async fn delete_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.engine.lifecycle().delete_key(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Seeds the translation cache in bulk without calling the provider.
async fn cache_translations(
    State(state): State<AppState>,
    Json(body): Json<CacheBody>,
) -> Result<Json<CacheView>, ApiError> {
    let mut translations: BTreeMap<LanguageCode, BTreeMap<String, String>> = BTreeMap::new();
    for (raw, entries) in body.translations {
        translations.insert(LanguageCode::new(raw)?, entries);
    }
    let report = state
        .engine
        .lifecycle()
        .cache_translations(&translations, state.engine.source_language())
        .await?;
    Ok(Json(CacheView {
        cached: report.cached,
        skipped: report.skipped,
        total: report.total,
    }))
}

/// Parses and validates a list of raw language codes.
fn parse_languages(raw: &[String]) -> Result<Vec<LanguageCode>, ApiError> {
    raw.iter().map(|code| Ok(LanguageCode::new(code.as_str())?)).collect()
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the full application router.
#[must_use]
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    let authenticated = Router::new()
        .route("/translations", post(submit_request).get(list_requests))
        .route("/translations/{id}", get(get_request))
        .route("/translations/{id}/cancel", post(cancel_request))
        .route("/translations/keys/{key}", delete(delete_key))
        .route("/translations/cache", put(cache_translations))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));
    Router::new()
        .route("/api/v1/health", get(health))
        .nest("/api/v1", authenticated)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
