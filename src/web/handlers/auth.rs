// Auth handlers: POST /api/admin/auth and POST /api/admin/logout.
//
// Login: checks the submitted password against ADMIN_PASSWORD, then sets the
// derived session token as the admin_token cookie.
//
// Logout: clears the cookie. It is never gated, so a stale session can
// always be cleared.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use crate::web::auth::{self, clear_cookie_header, set_cookie_header, AuthError};
use crate::web::AppState;

#[derive(Deserialize, Default)]
pub struct LoginRequest {
    #[serde(default)]
    password: Option<String>,
}

impl LoginRequest {
    /// Parse a login body. Anything that is not `{ "password": "<string>" }`
    /// (empty body, wrong type, invalid JSON) yields no password.
    fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

/// POST /api/admin/auth: authenticate with ADMIN_PASSWORD.
///
/// 200 with a session cookie on success, 401 on a wrong or missing password,
/// 500 when no admin password is configured. The body is read raw so a
/// malformed one still reaches the configuration check.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Response {
    let request = LoginRequest::from_body(&body);
    let (result, secure) = {
        let auth_config = state.auth.read().await;
        (
            auth::login(&auth_config, request.password.as_deref()),
            auth_config.secure_cookie,
        )
    };

    match result {
        Ok(token) => {
            info!("Admin logged in");
            (
                StatusCode::OK,
                [(header::SET_COOKIE, set_cookie_header(&token, secure))],
                Json(serde_json::json!({ "ok": true })),
            )
                .into_response()
        }
        Err(AuthError::InvalidPassword) => {
            warn!("Admin login failed: incorrect password");
            AuthError::InvalidPassword.into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// POST /api/admin/logout: clear the session cookie.
pub async fn logout() -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_cookie_header())],
        Json(serde_json::json!({ "ok": true })),
    )
        .into_response()
}
