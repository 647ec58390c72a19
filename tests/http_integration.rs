//! Integration tests for the checkout HTTP API.
//!
//! Requests go through the full router (layers included) with
//! `tower::ServiceExt::oneshot`, so no socket is bound.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use course_checkout::adapters::{
    build_router, CheckoutAppState, InMemoryCheckoutRepository, InMemoryCourseCatalogue,
    InMemoryEventBus,
};
use course_checkout::config::ServerConfig;
use course_checkout::domain::checkout::NavigationPaths;
use course_checkout::domain::foundation::Locale;

// =============================================================================
// Test Infrastructure
// =============================================================================

const SEED: &str = r#"
courses:
  - id: rust-101
    slug: intro-to-rust
    title: Intro to Rust
    format: scheduled
  - id: async-rust
    slug: async-rust
    title: Async Rust
    format: self-paced
"#;

fn app() -> Router {
    let state = CheckoutAppState::new(
        Arc::new(InMemoryCheckoutRepository::new()),
        Arc::new(InMemoryCourseCatalogue::from_yaml_str(SEED).unwrap()),
        Arc::new(InMemoryEventBus::new()),
        NavigationPaths::default(),
        Locale::En,
    );
    build_router(state, &ServerConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn start(app: &Router, course_id: &str) -> (StatusCode, Value) {
    send(app, Method::POST, "/api/checkout", Some(json!({ "course_id": course_id }))).await
}

// =============================================================================
// Start and read
// =============================================================================

#[tokio::test]
async fn start_returns_created_with_active_view() {
    let app = app();
    let (status, body) = start(&app, "rust-101").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["view"]["state"], "active");
    assert_eq!(body["view"]["stage"], "session");
    assert_eq!(body["view"]["position"], json!({ "current": 1, "total": 4 }));
    assert_eq!(body["view"]["step"]["course"]["slug"], "intro-to-rust");
}

#[tokio::test]
async fn get_returns_the_stored_view() {
    let app = app();
    let (_, created) = start(&app, "async-rust").await;
    let id = created["checkout_id"].as_str().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/checkout/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"]["stage"], "plan");
    assert_eq!(body["view"]["indicator"]["entries"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unknown_course_is_created_in_not_found_state() {
    let app = app();
    let (status, body) = start(&app, "missing").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["view"]["state"], "not_found");
}

#[tokio::test]
async fn empty_course_id_is_rejected() {
    let app = app();
    let (status, body) = start(&app, "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error_code"].is_string());
}

#[tokio::test]
async fn unknown_checkout_is_404() {
    let app = app();
    let uri = format!("/api/checkout/{}", uuid::Uuid::new_v4());
    let (status, body) = send(&app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "CHECKOUT_NOT_FOUND");
}

#[tokio::test]
async fn malformed_checkout_id_is_400() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/checkout/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["field"], "checkout_id");
}

// =============================================================================
// Step events
// =============================================================================

#[tokio::test]
async fn dispatch_advances_and_exits_with_redirect() {
    let app = app();
    let (_, created) = start(&app, "async-rust").await;
    let uri = format!("/api/checkout/{}/events", created["checkout_id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "type": "plan_selected", "plan": { "id": "full" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], json!({ "kind": "advanced", "from": "plan", "to": "payment" }));
    assert_eq!(body["view"]["step"]["payment_status"], "pending");

    let (_, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "type": "payment_succeeded", "receipt": { "transaction_id": "tx_9" } })),
    )
    .await;
    assert_eq!(body["view"]["stage"], "confirmation");

    let (_, body) = send(&app, Method::POST, &uri, Some(json!({ "type": "access_course" }))).await;
    assert_eq!(body["outcome"]["kind"], "exited");
    assert_eq!(body["redirect_to"], "/en/dashboard");
    assert!(body.get("view").is_none());
}

#[tokio::test]
async fn out_of_stage_event_is_ignored_not_rejected() {
    let app = app();
    let (_, created) = start(&app, "rust-101").await;
    let uri = format!("/api/checkout/{}/events", created["checkout_id"].as_str().unwrap());

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({ "type": "access_course" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["kind"], "ignored");
    assert_eq!(body["view"]["stage"], "session");
}

#[tokio::test]
async fn unknown_event_type_is_a_client_error() {
    let app = app();
    let (_, created) = start(&app, "rust-101").await;
    let uri = format!("/api/checkout/{}/events", created["checkout_id"].as_str().unwrap());

    let (status, _) = send(&app, Method::POST, &uri, Some(json!({ "type": "teleport" }))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
