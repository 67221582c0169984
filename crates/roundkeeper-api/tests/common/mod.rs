//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use roundkeeper_core::clock::Clock;
use roundkeeper_core::rng::DeterministicRng;
use roundkeeper_event_store::memory_event_repository::InMemoryEventRepository;
use roundkeeper_test_support::{FixedClock, MockRng};
use tower::ServiceExt;
use uuid::Uuid;

use roundkeeper_api::routes;
use roundkeeper_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 7, 4, 21, 30, 0).unwrap(),
    ))
}

/// Build the full app router over a fresh in-memory event store with a
/// deterministic Clock/RNG. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> Router {
    let clock = fixed_clock();
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
    let event_repository = Arc::new(InMemoryEventRepository::new());
    let app_state = AppState::new(clock, rng, event_repository);

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/tabs", routes::tabs::router())
        .with_state(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// POST a tab command that must succeed and return the id it created.
pub async fn create(app: &Router, path: &str, body: &serde_json::Value) -> Uuid {
    let (status, json) = post_json(app, &format!("/api/v1/tabs/{path}"), body).await;
    assert_eq!(status, StatusCode::OK, "{path} failed: {json}");
    json["created_id"].as_str().unwrap().parse().unwrap()
}

/// Start a session and return the tab id.
pub async fn start_tab(app: &Router) -> Uuid {
    let (status, json) = post_json(app, "/api/v1/tabs/start-session", &serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    json["aggregate_id"].as_str().unwrap().parse().unwrap()
}
