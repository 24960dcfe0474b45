// Auth middleware: stateless HMAC-SHA256 admin session cookie.
//
// Session token: lowercase hex of HMAC-SHA256(ADMIN_SESSION_SECRET, ADMIN_PASSWORD).
// It carries no timestamp, nonce, or identity, so there is exactly one valid
// token at a time and no session table. Rotating the admin password (or the
// signing secret) invalidates every outstanding cookie at once.
//
// Login flow:
//   POST /api/admin/auth { password } → compare with ADMIN_PASSWORD
//     success: set admin_token cookie to the derived token
//     failure: 401 (500 if no password is configured)
//
// Gate (this middleware, on every request):
//   canonicalize path → protected? → read admin_token cookie → re-derive
//   expected token from the current credentials → constant-time compare →
//   allow / redirect / 401

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use hmac::{Hmac, Mac};
use percent_encoding::percent_decode_str;
use sha2::Sha256;
use tracing::{error, warn};

use super::{api_error, AppState};
use crate::config::AuthConfig;

type HmacSha256 = Hmac<Sha256>;

/// Session cookie name.
pub const COOKIE_NAME: &str = "admin_token";

/// Cookie lifetime hint: 8 hours. The server never checks token age.
pub const SESSION_TTL_SECS: u64 = 60 * 60 * 8;

/// Admin login page; unauthenticated dashboard requests are sent here.
pub const LOGIN_PAGE: &str = "/admin";

const DASHBOARD_PREFIX: &str = "/admin/dashboard";
const ADMIN_API_PREFIX: &str = "/api/admin/";

/// Admin API endpoints that must stay reachable without a session.
pub const PUBLIC_ADMIN_API: &[&str] = &["/api/admin/auth", "/api/admin/logout"];

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Admin password not configured.")]
    NotConfigured,

    #[error("Incorrect password.")]
    InvalidPassword,

    #[error("session token derivation failed: {0}")]
    Crypto(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::NotConfigured => {
                error!("Admin login attempted but ADMIN_PASSWORD is not set");
                api_error(StatusCode::INTERNAL_SERVER_ERROR, &self.to_string())
            }
            AuthError::InvalidPassword => api_error(StatusCode::UNAUTHORIZED, &self.to_string()),
            AuthError::Crypto(ref e) => {
                error!(error = %e, "HMAC failure");
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
            }
        }
    }
}

/// Derive the session token for `password` under the signing `secret`.
///
/// Pure: the same inputs always produce the same 64-char lowercase hex string.
pub fn derive_token(secret: &str, password: &str) -> Result<String, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AuthError::Crypto(e.to_string()))?;
    mac.update(password.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time string comparison to prevent timing attacks.
///
/// Only the length check can return early; otherwise every byte pair is
/// visited and the differences are OR-accumulated.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Check a raw cookie value against the token for the configured password.
///
/// Always false when no admin password is configured.
pub fn is_valid_token(auth: &AuthConfig, token: &str) -> Result<bool, AuthError> {
    let Some(password) = auth.admin_password.as_deref() else {
        return Ok(false);
    };
    let expected = derive_token(&auth.session_secret, password)?;
    Ok(constant_time_eq(token, &expected))
}

/// Validate a login attempt and return the session token to set.
///
/// The configuration check comes first, so an unconfigured admin is reported
/// as such whatever was submitted. A missing password counts as a mismatch.
pub fn login(auth: &AuthConfig, submitted: Option<&str>) -> Result<String, AuthError> {
    let Some(expected) = auth.admin_password.as_deref() else {
        return Err(AuthError::NotConfigured);
    };
    let Some(submitted) = submitted else {
        return Err(AuthError::InvalidPassword);
    };
    if !constant_time_eq(submitted, expected) {
        return Err(AuthError::InvalidPassword);
    }
    derive_token(&auth.session_secret, submitted)
}

/// Build the `Set-Cookie` header value for a new session.
pub fn set_cookie_header(token: &str, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!(
        "{COOKIE_NAME}={token}; HttpOnly{secure_flag}; SameSite=Lax; Path=/; Max-Age={SESSION_TTL_SECS}"
    )
}

/// Build the `Set-Cookie` header value that clears the session cookie.
pub fn clear_cookie_header() -> String {
    format!("{COOKIE_NAME}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// The request path as the static file service resolves it: percent-decoded,
/// empty and `.` segments dropped, `..` applied. Always starts with `/` and
/// never ends with one (except the root itself).
pub fn canonical_path(raw: &str) -> String {
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Whether a request path needs an admin session.
///
/// Matching runs on the canonical path, so `//admin/dashboard`,
/// `/admin/./dashboard` and `/admin/%64ashboard` are all protected.
pub fn is_protected(path: &str) -> bool {
    is_protected_canonical(&canonical_path(path))
}

fn is_protected_canonical(path: &str) -> bool {
    if PUBLIC_ADMIN_API.contains(&path) {
        return false;
    }
    path.starts_with(DASHBOARD_PREFIX) || path.starts_with(ADMIN_API_PREFIX)
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Page request without a valid session: send the browser here.
    Redirect(&'static str),
    /// API request without a valid session: 401.
    Reject,
}

/// Decide whether a request for `path` carrying `cookie` may proceed.
///
/// `cookie` is the raw `admin_token` value, empty when absent.
pub fn decide(path: &str, cookie: &str, auth: &AuthConfig) -> Result<GateDecision, AuthError> {
    let path = canonical_path(path);
    if !is_protected_canonical(&path) {
        return Ok(GateDecision::Allow);
    }
    if is_valid_token(auth, cookie)? {
        return Ok(GateDecision::Allow);
    }
    if path.starts_with(ADMIN_API_PREFIX) {
        Ok(GateDecision::Reject)
    } else {
        Ok(GateDecision::Redirect(LOGIN_PAGE))
    }
}

/// Value of the session cookie, or an empty string when absent.
pub fn session_cookie(headers: &HeaderMap) -> String {
    for value in headers.get_all(header::COOKIE) {
        let Ok(cookie_header) = value.to_str() else {
            continue;
        };
        for pair in cookie_header.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name.trim() == COOKIE_NAME {
                    return value.trim().to_string();
                }
            }
        }
    }
    String::new()
}

/// Axum middleware: guard the admin dashboard and admin API.
///
/// Credentials are read from `AppState` on every request so a reload takes
/// effect immediately.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let cookie = session_cookie(request.headers());

    let decision = {
        let auth = state.auth.read().await;
        decide(&path, &cookie, &auth)
    };

    match decision {
        Ok(GateDecision::Allow) => next.run(request).await,
        Ok(GateDecision::Reject) => {
            warn!(path = %path, "Rejected admin API request without a valid session");
            api_error(StatusCode::UNAUTHORIZED, "Unauthorized.")
        }
        Ok(GateDecision::Redirect(location)) => {
            warn!(path = %path, "Redirecting unauthenticated dashboard request to login");
            Redirect::temporary(location).into_response()
        }
        Err(e) => e.into_response(),
    }
}
