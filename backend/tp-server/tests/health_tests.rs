//! Integration tests for the health endpoints
mod common;

use crate::common::{create_test_app_state, get, send};

use axum::http::StatusCode;
use serde_json::json;

use tp_server::build_router;

#[tokio::test]
async fn test_health_reports_database_and_version() {
    let state = create_test_app_state().await;

    let response = send(build_router(state), get("/health")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["status"], "healthy");
    assert_eq!(response.json["components"]["database"], "operational");
    assert_eq!(response.json["components"]["oauth"], json!([]));
    assert_eq!(response.json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_live_and_ready_answer_ok() {
    let state = create_test_app_state().await;

    let live = send(build_router(state.clone()), get("/live")).await;
    let ready = send(build_router(state), get("/ready")).await;

    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(ready.status, StatusCode::OK);
}
