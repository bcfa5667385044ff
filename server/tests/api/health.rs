//! Liveness endpoint behavior.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn health_reports_service_and_database() {
    let server = setup_test_server().await;

    let (status, body) = get(&server.router, "/api/pulse/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "pulse-api");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], json!(true));
    assert!(body["timestamp"].is_string());
}
