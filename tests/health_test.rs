mod common;

use axum::http::StatusCode;
use common::{response_json, FakeBehavior, TestApp, LOCAL_URL};

#[tokio::test]
async fn liveness_reports_up() {
    let app = TestApp::new(None, FakeBehavior::default());

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "up");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn readiness_requires_connection_string() {
    let app = TestApp::new(None, FakeBehavior::default());

    let response = app.get("/health/ready").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response_json(response).await["ready"], false);
}

#[tokio::test]
async fn readiness_does_not_touch_database() {
    let app = TestApp::new(Some(LOCAL_URL), FakeBehavior::default());

    let response = app.get("/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["database_configured"], true);
    assert_eq!(app.calls.connects(), 0);
}
