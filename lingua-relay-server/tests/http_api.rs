// lingua-relay-server/tests/http_api.rs
// ============================================================================
// Module: HTTP API Tests
// Description: Exercise the REST surface against an in-memory engine.
// Purpose: Validate authentication, status mapping, and end-to-end request flow.
// Dependencies: lingua-relay-server, lingua-relay-core, lingua-relay-providers, lingua-relay-queue, axum, http-body-util, serde_json, tower
// ============================================================================

//! ## Overview
//! Drives the router directly with `tower::ServiceExt::oneshot`: bearer
//! enforcement, submission validation, lifecycle status codes, translated
//! output on completed requests, key deletion, and bulk cache seeding.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use lingua_relay_core::EngineConfig;
use lingua_relay_core::InMemoryRelayStore;
use lingua_relay_core::LanguageCode;
use lingua_relay_core::LifecycleManager;
use lingua_relay_core::SystemClock;
use lingua_relay_core::TaskEngine;
use lingua_relay_providers::FixedTranslator;
use lingua_relay_queue::QueueConfig;
use lingua_relay_queue::TaskConsumer;
use lingua_relay_queue::task_channel;
use lingua_relay_server::AppState;
use lingua_relay_server::router;
use serde_json::Value;
use serde_json::json;
use tower::ServiceExt;

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Token accepted by every test router.
const TOKEN: &str = "secret-token";

/// Router plus the engine and consumer behind it.
struct Harness {
    /// Application router under test.
    app: Router,
    /// Engine shared with the router, for driving tasks directly.
    engine: TaskEngine,
    /// Consumer half of the task channel.
    consumer: TaskConsumer,
}

fn lang(code: &str) -> LanguageCode {
    LanguageCode::new(code).expect("valid language code")
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryRelayStore::new());
    let lifecycle = LifecycleManager::new(store);
    let (queue, consumer) = task_channel(&QueueConfig {
        capacity: 16,
        max_redeliveries: 2,
    });
    let translator = FixedTranslator::new()
        .with_entry("My App", lang("es"), "Mi Aplicación")
        .with_entry("My App", lang("fr"), "Mon App");
    let engine = TaskEngine::new(
        lifecycle,
        Arc::new(queue),
        Arc::new(translator),
        Arc::new(SystemClock::new()),
        EngineConfig::new(lang("en")),
    );
    let app = router(AppState::new(engine.clone(), TOKEN), 1024 * 1024);
    Harness {
        app,
        engine,
        consumer,
    }
}

fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(CONTENT_TYPE, "application/json");
    match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ============================================================================
// SECTION: Authentication Tests
// ============================================================================

#[tokio::test]
async fn health_is_public() {
    let harness = harness();
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&harness.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let harness = harness();
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/translations")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&harness.app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let harness = harness();
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/translations")
        .header(AUTHORIZATION, "Bearer wrong-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&harness.app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// SECTION: Submission Tests
// ============================================================================

#[tokio::test]
async fn submit_accepts_a_valid_request() {
    let harness = harness();
    let body = json!({
        "source_data": { "appTitle": "My App" },
        "target_languages": ["es", "fr"]
    });
    let (status, view) =
        send(&harness.app, authed("POST", "/api/v1/translations", Some(body))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["status"], "pending");
    assert!(!view["id"].as_str().unwrap().is_empty());
    assert_eq!(view["target_languages"], json!(["es", "fr"]));

    let (status, listed) = send(&harness.app, authed("GET", "/api/v1/translations", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn submit_rejects_empty_source_data() {
    let harness = harness();
    let body = json!({ "source_data": {}, "target_languages": ["es"] });
    let (status, view) =
        send(&harness.app, authed("POST", "/api/v1/translations", Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(view["error"].as_str().unwrap().contains("source_data"));
}

#[tokio::test]
async fn submit_rejects_empty_target_languages() {
    let harness = harness();
    let body = json!({ "source_data": { "appTitle": "My App" }, "target_languages": [] });
    let (status, _) =
        send(&harness.app, authed("POST", "/api/v1/translations", Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_rejects_malformed_language_code() {
    let harness = harness();
    let body = json!({ "source_data": { "appTitle": "My App" }, "target_languages": ["spanish"] });
    let (status, _) =
        send(&harness.app, authed("POST", "/api/v1/translations", Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// SECTION: Lookup and Cancellation Tests
// ============================================================================

#[tokio::test]
async fn unknown_request_is_not_found() {
    let harness = harness();
    let (status, _) =
        send(&harness.app, authed("GET", "/api/v1/translations/missing", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn second_cancel_conflicts() {
    let harness = harness();
    let body = json!({ "source_data": { "appTitle": "My App" }, "target_languages": ["es"] });
    let (_, view) = send(&harness.app, authed("POST", "/api/v1/translations", Some(body))).await;
    let id = view["id"].as_str().unwrap().to_string();

    let cancel_uri = format!("/api/v1/translations/{id}/cancel");
    let (status, cancelled) = send(&harness.app, authed("POST", &cancel_uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = send(&harness.app, authed("POST", &cancel_uri, None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn completed_request_reports_translated_data() {
    let mut harness = harness();
    let body = json!({ "source_data": { "appTitle": "My App" }, "target_languages": ["es", "fr"] });
    let (_, view) = send(&harness.app, authed("POST", "/api/v1/translations", Some(body))).await;
    let id = view["id"].as_str().unwrap().to_string();

    let delivery = harness.consumer.recv().await.unwrap();
    harness.engine.process_task(delivery.task()).await.unwrap();
    delivery.ack();

    let uri = format!("/api/v1/translations/{id}");
    let (status, completed) = send(&harness.app, authed("GET", &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["status"], "completed");
    assert!(completed["completed_at"].is_i64());
    assert_eq!(completed["translated_data"]["es"]["appTitle"], "Mi Aplicación");
    assert_eq!(completed["translated_data"]["fr"]["appTitle"], "Mon App");
}

// ============================================================================
// SECTION: Key and Cache Tests
// ============================================================================

#[tokio::test]
async fn delete_unknown_key_is_not_found() {
    let harness = harness();
    let (status, _) =
        send(&harness.app, authed("DELETE", "/api/v1/translations/keys/missing", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_existing_key_returns_no_content() {
    let mut harness = harness();
    let body = json!({ "source_data": { "appTitle": "My App" }, "target_languages": ["es"] });
    let (_, _) = send(&harness.app, authed("POST", "/api/v1/translations", Some(body))).await;
    let delivery = harness.consumer.recv().await.unwrap();
    harness.engine.process_task(delivery.task()).await.unwrap();
    delivery.ack();

    let (status, _) =
        send(&harness.app, authed("DELETE", "/api/v1/translations/keys/appTitle", None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
        send(&harness.app, authed("DELETE", "/api/v1/translations/keys/appTitle", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cache_seeding_reports_written_and_skipped_keys() {
    let harness = harness();
    let body = json!({
        "translations": {
            "en": { "greeting": "Hello" },
            "es": { "greeting": "Hola", "orphan": "Huérfano" }
        }
    });
    let (status, report) =
        send(&harness.app, authed("PUT", "/api/v1/translations/cache", Some(body))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["cached"], 1);
    assert_eq!(report["skipped"], json!(["orphan"]));
    assert_eq!(report["total"], 2);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let harness = harness();
    let small = router(AppState::new(harness.engine.clone(), TOKEN), 64);
    let body = json!({
        "source_data": { "appTitle": "My App".repeat(64) },
        "target_languages": ["es"]
    });
    let (status, _) = send(&small, authed("POST", "/api/v1/translations", Some(body))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
