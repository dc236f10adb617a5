//! Common utilities for integration tests

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use llm_sim_server::{app, config::ServerConfig, AppState};
use serde_json::Value;
use tower::ServiceExt;

/// Configuration used by the tests: no rate limiting, permissive CORS.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        rate_limit_per_minute: 0,
        ..ServerConfig::default()
    }
}

/// Create a test app instance along with the state it serves
#[allow(dead_code)]
pub fn create_test_app() -> (Router, AppState) {
    create_app_with(test_config())
}

/// Same as [`create_test_app`] with an explicit configuration
#[allow(dead_code)]
pub fn create_app_with(config: ServerConfig) -> (Router, AppState) {
    let state = AppState::new(config);
    (app(state.clone()), state)
}

/// POST a JSON body to `/stream` (or any other `uri`)
#[allow(dead_code)]
pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}
