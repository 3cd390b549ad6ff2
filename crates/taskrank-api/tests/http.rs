//! Integration tests for the HTTP endpoints.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use taskrank_api::{AppState, ServiceConfig, router};
use taskrank_core::logging::init_test_logging;
use tower::ServiceExt;

fn app() -> Router {
    init_test_logging();
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    router(AppState::new(ServiceConfig::default()).with_today(today))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method(Method::GET).uri(uri).body(Body::empty()).unwrap()
}

/// Percent-encode everything but unreserved characters.
fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect()
}

fn sample_tasks() -> Value {
    json!([
        {"id": 10, "title": "Fix login bug", "due_date": "2025-06-14", "estimated_hours": 3, "importance": 8, "dependencies": []},
        {"id": 11, "title": "Write docs", "due_date": "2025-08-01", "estimated_hours": 6, "importance": 3, "dependencies": [10]},
        {"id": 12, "title": "Ship release", "due_date": "2025/06/20", "estimated_hours": "2", "importance": 9, "dependencies": [10, 11]},
        {"title": "Plan sprint", "importance": "oops"}
    ])
}

#[tokio::test]
async fn analyze_sorts_by_score() {
    let (status, body) = send(post("/api/tasks/analyze/", json!({"tasks": sample_tasks()}).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["circular_dependencies_detected"], false);

    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 4);
    let scores: Vec<f64> = tasks.iter().map(|t| t["score"].as_f64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    // the overdue task leads
    assert_eq!(tasks[0]["id"], 10);
    assert!(tasks[0]["explanation"].as_str().unwrap().contains("OVERDUE"));

    assert_eq!(tasks[1]["id"], 12);
    assert_eq!(tasks[1]["due_date"], "2025-06-20");
    assert_eq!(tasks[1]["estimated_hours"], 2);

    // positional id for the task without one
    assert!(tasks.iter().any(|t| t["id"] == 3 && t["title"] == "Plan sprint" && t["importance"] == 0));
}

#[tokio::test]
async fn analyze_accepts_bare_list() {
    let (status, body) = send(post("/api/tasks/analyze/", sample_tasks().to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn analyze_flags_cycles() {
    let payload = json!([
        {"id": 1, "dependencies": [2]},
        {"id": 2, "dependencies": [3]},
        {"id": 3, "dependencies": [1]}
    ]);
    let (status, body) = send(post("/api/tasks/analyze", payload.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["circular_dependencies_detected"], true);
    assert_eq!(body["cycle"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn analyze_rejects_other_methods() {
    let (status, body) = send(get("/api/tasks/analyze/")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "only POST allowed");
}

#[tokio::test]
async fn analyze_rejects_invalid_json() {
    let (status, body) = send(post("/api/tasks/analyze/", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid JSON");
}

#[tokio::test]
async fn analyze_rejects_oversized_body_as_json() {
    let app = router(AppState::new(ServiceConfig::default().with_max_body_bytes(64)));
    let response = app
        .oneshot(post("/api/tasks/analyze/", sample_tasks().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "request body too large");
}

#[tokio::test]
async fn analyze_rejects_non_list_payload() {
    let (status, body) = send(post("/api/tasks/analyze/", r#"{"tasks": {"id": 1}}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "expected a list of tasks");
}

#[tokio::test]
async fn suggest_returns_top_three() {
    let uri = format!("/api/tasks/suggest/?tasks={}", encode(&sample_tasks().to_string()));
    let (status, body) = send(get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    let top = body["top_3"].as_array().unwrap();
    assert_eq!(top.len(), 3);
    assert_eq!(top[0]["id"], 10);
    assert!(top[0].get("explanation").is_some());
}

#[tokio::test]
async fn suggest_requires_tasks_param() {
    let (status, body) = send(get("/api/tasks/suggest/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "please provide tasks param as JSON");
}

#[tokio::test]
async fn suggest_rejects_invalid_json() {
    let uri = format!("/api/tasks/suggest/?tasks={}", encode("[{"));
    let (status, body) = send(get(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid tasks JSON");
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
