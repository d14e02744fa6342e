//! HTTP surface tests against the in-memory router.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use codepad_core::Config;
use codepad_gateway::Gateway;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(request: Request<Body>) -> (StatusCode, Value) {
    let router = Gateway::from_config(&Config::default()).router();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn run(body: Value) -> Request<Body> {
    Request::post("/api/run")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_run_returns_normalized_result() {
    let (status, body) = call(run(json!({
        "code": "console.log(prompt('Name?')); throw new Error('done');",
        "input": "Grace",
    })))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logs"], json!(["PROMPT: Name?", "Grace"]));
    assert_eq!(body["errors"], json!(["done"]));
    assert_eq!(body["terminalState"], "runtimeError");
    assert_eq!(body["language"], "javascript");
}

#[tokio::test]
async fn test_language_inferred_from_path() {
    let mut config = Config::default();
    config.execution.python.interpreter = "/nonexistent/python3".to_string();
    let router = Gateway::from_config(&config).router();

    let response = router
        .oneshot(run(json!({ "code": "print(1)", "path": "scripts/hello.py" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["language"], "python");
    assert_eq!(body["terminalState"], "spawnFailed");
}

#[tokio::test]
async fn test_timeout_over_http() {
    let (status, body) = call(run(json!({ "code": "while (true) {}" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["terminalState"], "timedOut");
    assert_eq!(body["errors"], json!(["Execution timeout"]));
}

#[tokio::test]
async fn test_unsupported_language() {
    let (status, body) = call(run(json!({ "code": "", "language": "ruby" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported language: ruby");
}

#[tokio::test]
async fn test_cors_preflight() {
    let router = Gateway::from_config(&Config::default()).router();
    let response = router
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/run")
                .header("origin", "http://example.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_health() {
    let (status, body) = call(Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}
