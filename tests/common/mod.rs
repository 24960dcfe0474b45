// Shared fixtures for the web integration tests: in-memory store, a scratch
// public directory, and small request/response helpers for `oneshot`.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use blackink::config::{AuthConfig, Config};
use blackink::db::models::Product;
use blackink::db::SqliteDatabase;
use blackink::web::{build_router, AppState};

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "secret123";

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// A fresh, not-yet-created directory under the system temp dir.
pub fn scratch_dir() -> PathBuf {
    let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("blackink-test-{}-{}", std::process::id(), n))
}

pub fn test_state(password: Option<&str>) -> AppState {
    let db = Arc::new(SqliteDatabase::in_memory().unwrap());
    let public_dir = scratch_dir();
    let config = Config {
        db_path: ":memory:".to_string(),
        uploads_dir: public_dir.join("uploads"),
        public_dir,
        auth: AuthConfig::new(password, SECRET),
    };
    AppState::new(db, config)
}

pub fn app(state: &AppState) -> Router {
    build_router(state.clone())
}

pub async fn send(state: &AppState, request: Request<Body>) -> Response<Body> {
    app(state).oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, format!("admin_token={token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("admin_token={token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `admin_token` value from a Set-Cookie header.
pub fn cookie_value(response: &Response<Body>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let first = set_cookie.split(';').next()?;
    let (name, value) = first.split_once('=')?;
    (name == "admin_token").then(|| value.to_string())
}

/// Log in through the API and return the session token.
pub async fn login(state: &AppState) -> String {
    let response = send(
        state,
        json_request("POST", "/api/admin/auth", serde_json::json!({ "password": PASSWORD }), None),
    )
    .await;
    cookie_value(&response).unwrap()
}

pub fn product(id: &str, title: &str, price: f64, category: &str, stock: u32) -> Product {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": title,
        "price": price,
        "category": category,
        "stock": stock,
    }))
    .unwrap()
}
