#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use smslog_api::auth::jwt::{generate_access_token, JwtConfig};
use smslog_api::config::ServerConfig;
use smslog_api::router::build_app_router;
use smslog_api::state::AppState;
use smslog_core::message::MessageEnvelope;
use smslog_core::roles::{ROLE_ADMIN, ROLE_OPERATOR, ROLE_VIEWER};
use smslog_core::types::DbId;
use smslog_pipeline::{MessageLogger, OutboundSender, ReplyService, SendError};

/// Signing secret shared by the test app and the token helpers.
const TEST_JWT_SECRET: &str = "integration-test-signing-secret";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout. The gateway URL is never contacted:
/// the test app swaps the HTTP sender for a [`RecordingSender`].
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        outbound_gateway_url: "http://localhost:8001/send".to_string(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

// ---------------------------------------------------------------------------
// Outbound sender stub
// ---------------------------------------------------------------------------

/// Outbound sender that records every envelope instead of delivering it.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<MessageEnvelope>>,
}

#[async_trait::async_trait]
impl OutboundSender for RecordingSender {
    async fn send(&self, envelope: &MessageEnvelope) -> Result<(), SendError> {
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This goes through [`build_app_router`] so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_sender(pool).0
}

/// Like [`build_test_app`], but also hands back the [`RecordingSender`] so
/// tests can assert on the envelopes the app tried to deliver.
pub fn build_test_app_with_sender(pool: PgPool) -> (Router, Arc<RecordingSender>) {
    let config = test_config();
    let sender = Arc::new(RecordingSender::default());

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        logger: MessageLogger::new(pool.clone()),
        replies: ReplyService::new(pool, sender.clone()),
    };

    (build_app_router(state, &config), sender)
}

// ---------------------------------------------------------------------------
// Token helpers
// ---------------------------------------------------------------------------

/// Mint an access token for an arbitrary user id and role.
pub fn token_for_role(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt)
        .expect("token generation should succeed")
}

pub fn admin_token() -> String {
    token_for_role(1, ROLE_ADMIN)
}

pub fn operator_token() -> String {
    token_for_role(2, ROLE_OPERATOR)
}

pub fn viewer_token() -> String {
    token_for_role(3, ROLE_VIEWER)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request without authentication.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body, without authentication.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a urlencoded form body and a Bearer token.
pub async fn post_form_auth(app: Router, uri: &str, form: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(form.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
