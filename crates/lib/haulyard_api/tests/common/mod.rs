//! Shared helpers for API integration tests.
//!
//! Tests run the full router against the in-memory store via
//! `tower::ServiceExt::oneshot`; no network or database is involved.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use haulyard_api::AppState;
use haulyard_api::config::ApiConfig;
use haulyard_core::auth::password::hash_password;
use haulyard_core::auth::session::SessionConfig;
use haulyard_core::mail::{MailError, Mailer};
use haulyard_core::models::account::{Account, Role};
use haulyard_core::notify::{ChannelPublisher, NotificationEvent};
use haulyard_core::otp::OtpStore;
use haulyard_core::store::{AccountStore, MemoryAccountStore, NewAccount};
use tower::ServiceExt;

pub const ACCESS_SECRET: &[u8] = b"test-access-secret";
pub const REFRESH_SECRET: &[u8] = b"test-refresh-secret";
pub const ACCESS_TTL_SECS: i64 = 900;

/// Mailer that records every code instead of sending it.
#[derive(Default)]
pub struct CapturingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait::async_trait]
impl Mailer for CapturingMailer {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), MailError> {
        self.sent.lock().unwrap().push((to.into(), code.into()));
        Ok(())
    }
}

impl CapturingMailer {
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(addr, _)| addr == to)
            .map(|(_, code)| code.clone())
    }
}

/// Publisher that records events instead of delivering them.
#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<(String, NotificationEvent)>>,
}

#[async_trait::async_trait]
impl ChannelPublisher for RecordingPublisher {
    async fn publish(&self, channel: &str, event: &NotificationEvent) {
        self.events
            .lock()
            .unwrap()
            .push((channel.to_string(), event.clone()));
    }
}

pub fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        session: SessionConfig::new(
            ACCESS_SECRET.to_vec(),
            ACCESS_TTL_SECS,
            REFRESH_SECRET.to_vec(),
            3600,
        ),
        cookie_secure: false,
    }
}

/// Full router plus handles to the collaborators behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryAccountStore>,
    pub otp: Arc<OtpStore>,
    pub mailer: Arc<CapturingMailer>,
    pub publisher: Arc<RecordingPublisher>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryAccountStore::new());
    let otp = Arc::new(OtpStore::new());
    let mailer = Arc::new(CapturingMailer::default());
    let publisher = Arc::new(RecordingPublisher::default());

    let state = AppState {
        store: store.clone(),
        config: test_config(),
        otp: otp.clone(),
        mailer: mailer.clone(),
        publisher: publisher.clone(),
    };

    TestApp {
        router: haulyard_api::router(state),
        store,
        otp,
        mailer,
        publisher,
    }
}

/// Router over an arbitrary store; used by tests that wrap the store.
pub fn router_over(store: Arc<dyn AccountStore>) -> Router {
    let state = AppState {
        store,
        config: test_config(),
        otp: Arc::new(OtpStore::new()),
        mailer: Arc::new(CapturingMailer::default()),
        publisher: Arc::new(RecordingPublisher::default()),
    };
    haulyard_api::router(state)
}

/// Insert a verified, active account directly into the store.
pub async fn seed_account(
    store: &MemoryAccountStore,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Account {
    store
        .insert(NewAccount {
            name: name.into(),
            email: email.into(),
            password_hash: Some(hash_password(password).expect("hash")),
            phone: None,
            address: None,
            picture: None,
            role,
            is_verified: true,
        })
        .await
        .expect("seed account")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("build request")
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.expect("request")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

/// Login and return the parsed token response body.
pub async fn login(router: &Router, email: &str, password: &str) -> serde_json::Value {
    let response = send(
        router,
        json_request(
            "POST",
            "/auth/login",
            serde_json::json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK, "login failed");
    body_json(response).await
}

/// Login and return just the access token.
pub async fn login_token(router: &Router, email: &str, password: &str) -> String {
    login(router, email, password).await["accessToken"]
        .as_str()
        .expect("accessToken is string")
        .to_string()
}
