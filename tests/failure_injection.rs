//! Failure injection tests for the counter endpoint and the log reader.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use tower::ServiceExt;

use visitor_counter::config::CounterConfig;
use visitor_counter::http::HttpServer;
use visitor_counter::reader::{self, LogReader};
use visitor_counter::visits::model::{COUNTER_KEY, COUNT_ATTRIBUTE};

mod common;

#[tokio::test]
async fn test_increment_failure_returns_500_and_logs_nothing() {
    let store = common::FaultyStore::new();
    store.fail_add.store(true, Ordering::SeqCst);
    let server = HttpServer::new(CounterConfig::default(), Arc::new(store.clone()));

    let response = server
        .router()
        .oneshot(common::visit_request(&[("X-Forwarded-For", "1.2.3.4")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let body = common::body_json(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("injected failure"));
    assert!(body.get("visitor_count").is_none());

    assert!(store.inner.is_empty(), "no counter and no visit record");
}

#[tokio::test]
async fn test_log_write_failure_keeps_increment() {
    let store = common::FaultyStore::new();
    store.fail_put.store(true, Ordering::SeqCst);
    let server = HttpServer::new(CounterConfig::default(), Arc::new(store.clone()));

    let response = server
        .router()
        .oneshot(common::visit_request(&[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = common::body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("put_item failed"));

    // Accepted inconsistency: counted but not logged.
    assert_eq!(
        store.inner.get(COUNTER_KEY).unwrap().get_number(COUNT_ATTRIBUTE),
        Some(1)
    );
    assert!(common::visit_items(&store.inner).is_empty());
}

#[tokio::test]
async fn test_recovery_after_failure() {
    let store = common::FaultyStore::new();
    let server = HttpServer::new(CounterConfig::default(), Arc::new(store.clone()));

    store.fail_add.store(true, Ordering::SeqCst);
    let failed = server.router().oneshot(common::visit_request(&[])).await.unwrap();
    assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

    store.fail_add.store(false, Ordering::SeqCst);
    let ok = server.router().oneshot(common::visit_request(&[])).await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(common::body_json(ok).await["visitor_count"], 1);
}

#[tokio::test]
async fn test_slow_store_times_out_with_json_error() {
    let store = common::FaultyStore::new();
    store.add_delay_ms.store(2_000, Ordering::SeqCst);
    let mut config = CounterConfig::default();
    config.timeouts.request_secs = 1;
    let server = HttpServer::new(config, Arc::new(store.clone()));

    let response = server
        .router()
        .oneshot(common::visit_request(&[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(common::body_json(response).await["error"], "request timed out");

    assert!(store.inner.is_empty(), "abandoned visit never reached the table");
}

#[tokio::test]
async fn test_scan_failure_surfaces_store_error() {
    let store = common::FaultyStore::new();
    store.fail_scan.store(true, Ordering::SeqCst);

    let reader = LogReader::new(Arc::new(store));
    let err = reader.recent_visits(Some(10)).await.unwrap_err();
    assert_eq!(err.operation(), "scan");
}

#[tokio::test]
async fn test_scan_failure_prints_single_error_line() {
    let store = common::FaultyStore::new();
    store.fail_scan.store(true, Ordering::SeqCst);

    let mut out = Vec::new();
    let result = reader::run(Arc::new(store), Some(5), &mut out).await;

    assert!(result.is_ok(), "store failure is reported, not returned");
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Error reading from store: scan failed on table 'VisitorCounter': injected failure\n"
    );
}
