#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tally_api::auth::jwt::{generate_access_token, JwtConfig};
use tally_api::config::ServerConfig;
use tally_api::router::build_app_router;
use tally_api::state::AppState;
use tally_core::roles::{ROLE_ADMIN, ROLE_CONTRIBUTOR, ROLE_EDITOR, ROLE_VIEWER};
use tally_core::scoring::ScoringPolicy;
use tally_core::types::DbId;
use tower::ServiceExt;

pub const ADMIN_ID: DbId = 1;
pub const EDITOR_ID: DbId = 2;
pub const CONTRIBUTOR_ID: DbId = 3;
pub const VIEWER_ID: DbId = 4;

/// Build a test `ServerConfig` with safe defaults and the default scoring policy.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
        scoring: ScoringPolicy::default(),
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Bearer token for `user_id` with `role`, signed with the test secret.
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

pub fn admin_token() -> String {
    token_for(ADMIN_ID, ROLE_ADMIN)
}

pub fn editor_token() -> String {
    token_for(EDITOR_ID, ROLE_EDITOR)
}

pub fn contributor_token() -> String {
    token_for(CONTRIBUTOR_ID, ROLE_CONTRIBUTOR)
}

pub fn viewer_token() -> String {
    token_for(VIEWER_ID, ROLE_VIEWER)
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, "GET", uri, Some(token), None).await
}

pub async fn get_anonymous(app: Router, uri: &str) -> Response<Body> {
    send(app, "GET", uri, None, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    send(app, "POST", uri, Some(token), Some(json)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    send(app, "PUT", uri, Some(token), Some(json)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, "DELETE", uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a resource as admin and return its id.
pub async fn create_resource(pool: &PgPool, json: serde_json::Value) -> DbId {
    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/resources", &admin_token(), json).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
