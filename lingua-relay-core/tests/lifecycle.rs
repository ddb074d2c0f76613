// lingua-relay-core/tests/lifecycle.rs
// ============================================================================
// Module: Lifecycle Manager Tests
// Description: Validate request state transitions and per-key dedup behavior.
// Purpose: Ensure terminal-state protection and cache coherency rules hold.
// Dependencies: lingua-relay-core, tokio
// ============================================================================

//! ## Overview
//! Conformance tests for the request lifecycle manager over the in-memory
//! store: state machine guards, pending key computation, translated data
//! assembly, key deletion, and bulk cache seeding.

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

use std::collections::BTreeMap;
use std::sync::Arc;

use lingua_relay_core::InMemoryRelayStore;
use lingua_relay_core::LanguageCode;
use lingua_relay_core::LifecycleError;
use lingua_relay_core::LifecycleManager;
use lingua_relay_core::RelayStore;
use lingua_relay_core::RequestId;
use lingua_relay_core::RequestStatus;
use lingua_relay_core::Timestamp;
use lingua_relay_core::TranslationKey;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn lang(code: &str) -> LanguageCode {
    LanguageCode::new(code).expect("valid language code")
}

fn at(millis: i64) -> Timestamp {
    Timestamp::from_unix_millis(millis)
}

fn source(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}

fn manager() -> (LifecycleManager, Arc<InMemoryRelayStore>) {
    let store = Arc::new(InMemoryRelayStore::new());
    (LifecycleManager::new(store.clone()), store)
}

// ============================================================================
// SECTION: State Machine Tests
// ============================================================================

#[tokio::test]
async fn create_starts_pending() {
    let (manager, _) = manager();
    let request = manager
        .create(source(&[("appTitle", "My App")]), vec![lang("es")], at(10))
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.created_at, at(10));
    assert_eq!(request.updated_at, at(10));
    assert!(request.completed_at.is_none());

    let loaded = manager.request(&request.id).await.unwrap();
    assert_eq!(loaded, request);
}

#[tokio::test]
async fn lookup_of_unknown_request_is_not_found() {
    let (manager, _) = manager();
    let err = manager.request(&RequestId::new("missing")).await.unwrap_err();
    assert!(matches!(err, LifecycleError::RequestNotFound(_)));
}

#[tokio::test]
async fn completion_records_completed_at() {
    let (manager, _) = manager();
    let request =
        manager.create(source(&[("k", "v")]), vec![lang("es")], at(10)).await.unwrap();
    manager.mark_processing(&request.id, at(20)).await.unwrap();
    let completed = manager.mark_completed(&request.id, at(30)).await.unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);
    assert_eq!(completed.updated_at, at(30));
    assert_eq!(completed.completed_at, Some(at(30)));
}

#[tokio::test]
async fn terminal_states_reject_every_transition() {
    let (manager, _) = manager();
    let request =
        manager.create(source(&[("k", "v")]), vec![lang("es")], at(10)).await.unwrap();
    let cancelled = manager.cancel(&request.id, at(20)).await.unwrap();
    assert_eq!(cancelled.status, RequestStatus::Cancelled);

    for result in [
        manager.cancel(&request.id, at(30)).await,
        manager.mark_processing(&request.id, at(30)).await,
        manager.mark_completed(&request.id, at(30)).await,
        manager.mark_failed(&request.id, at(30)).await,
    ] {
        match result {
            Err(LifecycleError::StateConflict {
                status, ..
            }) => assert_eq!(status, RequestStatus::Cancelled),
            other => panic!("expected state conflict, got {other:?}"),
        }
    }

    // The record itself is untouched by the rejected transitions.
    let loaded = manager.request(&request.id).await.unwrap();
    assert_eq!(loaded.status, RequestStatus::Cancelled);
    assert_eq!(loaded.updated_at, at(20));
}

#[tokio::test]
async fn processing_can_be_reentered_for_redelivery() {
    let (manager, _) = manager();
    let request =
        manager.create(source(&[("k", "v")]), vec![lang("es")], at(10)).await.unwrap();
    manager.mark_processing(&request.id, at(20)).await.unwrap();
    let again = manager.mark_processing(&request.id, at(25)).await.unwrap();
    assert_eq!(again.status, RequestStatus::Processing);
    assert_eq!(again.updated_at, at(25));
}

#[tokio::test]
async fn incomplete_requests_excludes_terminal() {
    let (manager, _) = manager();
    let pending =
        manager.create(source(&[("a", "1")]), vec![lang("es")], at(1)).await.unwrap();
    let processing =
        manager.create(source(&[("b", "2")]), vec![lang("es")], at(2)).await.unwrap();
    manager.mark_processing(&processing.id, at(3)).await.unwrap();
    let done = manager.create(source(&[("c", "3")]), vec![lang("es")], at(4)).await.unwrap();
    manager.mark_completed(&done.id, at(5)).await.unwrap();

    let incomplete = manager.incomplete_requests().await.unwrap();
    let ids: Vec<&str> = incomplete.iter().map(|request| request.id.as_str()).collect();
    assert_eq!(incomplete.len(), 2);
    assert!(ids.contains(&pending.id.as_str()));
    assert!(ids.contains(&processing.id.as_str()));
}

// ============================================================================
// SECTION: Pending Key Tests
// ============================================================================

#[tokio::test]
async fn new_keys_are_persisted_and_scheduled() {
    let (manager, store) = manager();
    let pending = manager
        .pending_keys(&source(&[("appTitle", "My App")]), &[lang("es"), lang("fr")])
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].key, "appTitle");
    assert_eq!(pending[0].value, "My App");

    let stored = store.key("appTitle").await.unwrap().unwrap();
    assert_eq!(stored.value, "My App");
    assert!(stored.translations.is_empty());
}

#[tokio::test]
async fn metadata_entries_are_skipped() {
    let (manager, store) = manager();
    let data = source(&[("appTitle", "My App"), ("@appTitle", "{\"description\": \"title\"}")]);
    let pending = manager.pending_keys(&data, &[lang("es")]).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].key, "appTitle");
    assert!(!store.key_exists("@appTitle").await.unwrap());
}

#[tokio::test]
async fn fully_cached_keys_produce_no_work() {
    let (manager, store) = manager();
    let mut key = TranslationKey::new("appTitle", "My App");
    key.insert_translation(lang("es"), "Mi Aplicación");
    store.save_key(&key).await.unwrap();

    let pending =
        manager.pending_keys(&source(&[("appTitle", "My App")]), &[lang("es")]).await.unwrap();
    assert!(pending.is_empty());
}

#[tokio::test]
async fn partially_cached_keys_are_scheduled() {
    let (manager, store) = manager();
    let mut key = TranslationKey::new("appTitle", "My App");
    key.insert_translation(lang("es"), "Mi Aplicación");
    store.save_key(&key).await.unwrap();

    let pending = manager
        .pending_keys(&source(&[("appTitle", "My App")]), &[lang("es"), lang("fr")])
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert!(pending[0].has_translation(&lang("es")));
}

#[tokio::test]
async fn value_change_clears_cached_translations() {
    let (manager, store) = manager();
    let mut key = TranslationKey::new("appTitle", "My App");
    key.insert_translation(lang("es"), "Mi Aplicación");
    key.insert_translation(lang("fr"), "Mon App");
    store.save_key(&key).await.unwrap();

    let pending =
        manager.pending_keys(&source(&[("appTitle", "New Name")]), &[lang("es")]).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert!(pending[0].translations.is_empty());

    let stored = store.key("appTitle").await.unwrap().unwrap();
    assert_eq!(stored.value, "New Name");
    assert!(stored.translations.is_empty());
}

// ============================================================================
// SECTION: Translated Data Tests
// ============================================================================

#[tokio::test]
async fn translated_data_is_grouped_by_language() {
    let (manager, store) = manager();
    let mut title = TranslationKey::new("appTitle", "My App");
    title.insert_translation(lang("es"), "Mi Aplicación");
    title.insert_translation(lang("fr"), "Mon App");
    store.save_key(&title).await.unwrap();
    let mut welcome = TranslationKey::new("welcomeMessage", "Welcome!");
    welcome.insert_translation(lang("es"), "¡Bienvenido!");
    store.save_key(&welcome).await.unwrap();

    let data = source(&[("appTitle", "My App"), ("welcomeMessage", "Welcome!"), ("@x", "m")]);
    let translated =
        manager.translated_data_for(&data, &[lang("es"), lang("fr")]).await.unwrap();

    assert_eq!(translated[&lang("es")]["appTitle"], "Mi Aplicación");
    assert_eq!(translated[&lang("es")]["welcomeMessage"], "¡Bienvenido!");
    assert_eq!(translated[&lang("fr")]["appTitle"], "Mon App");
    assert!(!translated[&lang("fr")].contains_key("welcomeMessage"));
    assert!(!translated[&lang("es")].contains_key("@x"));
}

// ============================================================================
// SECTION: Key Deletion Tests
// ============================================================================

#[tokio::test]
async fn delete_key_cascades() {
    let (manager, store) = manager();
    let mut key = TranslationKey::new("appTitle", "My App");
    key.insert_translation(lang("es"), "Mi Aplicación");
    store.save_key(&key).await.unwrap();

    manager.delete_key("appTitle").await.unwrap();
    assert!(store.key("appTitle").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_of_unknown_key_is_not_found() {
    let (manager, _) = manager();
    let err = manager.delete_key("missing").await.unwrap_err();
    assert!(matches!(err, LifecycleError::KeyNotFound(name) if name == "missing"));
}

// ============================================================================
// SECTION: Bulk Cache Tests
// ============================================================================

#[tokio::test]
async fn cache_translations_seeds_keys_with_source_text() {
    let (manager, store) = manager();
    let mut translations: BTreeMap<LanguageCode, BTreeMap<String, String>> = BTreeMap::new();
    translations.insert(lang("en"), source(&[("appTitle", "My App")]));
    translations.insert(lang("es"), source(&[("appTitle", "Mi Aplicación")]));
    translations.insert(lang("fr"), source(&[("appTitle", "Mon App")]));

    let report = manager.cache_translations(&translations, &lang("en")).await.unwrap();
    assert_eq!(report.cached, 1);
    assert_eq!(report.total, 1);
    assert!(report.skipped.is_empty());

    let stored = store.key("appTitle").await.unwrap().unwrap();
    assert_eq!(stored.value, "My App");
    assert_eq!(stored.translations[&lang("es")], "Mi Aplicación");
    assert_eq!(stored.translations[&lang("fr")], "Mon App");
    assert!(!stored.translations.contains_key(&lang("en")));
}

#[tokio::test]
async fn cache_translations_skips_keys_without_source_entry() {
    let (manager, store) = manager();
    let mut translations: BTreeMap<LanguageCode, BTreeMap<String, String>> = BTreeMap::new();
    translations.insert(lang("en"), source(&[("appTitle", "My App")]));
    translations
        .insert(lang("es"), source(&[("appTitle", "Mi Aplicación"), ("orphan", "huérfano")]));

    let report = manager.cache_translations(&translations, &lang("en")).await.unwrap();
    assert_eq!(report.cached, 1);
    assert_eq!(report.total, 2);
    assert_eq!(report.skipped, vec!["orphan".to_string()]);
    assert!(!store.key_exists("orphan").await.unwrap());
}

#[tokio::test]
async fn cache_translations_replaces_stale_cache_on_value_change() {
    let (manager, store) = manager();
    let mut key = TranslationKey::new("appTitle", "Old Name");
    key.insert_translation(lang("de"), "Alter Name");
    store.save_key(&key).await.unwrap();

    let mut translations: BTreeMap<LanguageCode, BTreeMap<String, String>> = BTreeMap::new();
    translations.insert(lang("en"), source(&[("appTitle", "New Name")]));
    translations.insert(lang("es"), source(&[("appTitle", "Nuevo Nombre")]));
    manager.cache_translations(&translations, &lang("en")).await.unwrap();

    let stored = store.key("appTitle").await.unwrap().unwrap();
    assert_eq!(stored.value, "New Name");
    assert_eq!(stored.translations[&lang("es")], "Nuevo Nombre");
    assert!(!stored.translations.contains_key(&lang("de")));
}
