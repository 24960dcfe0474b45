// Admin session tests: login, logout, and the request gate, driven through
// the full router with `oneshot`.
#![cfg(feature = "web")]

mod common;

use axum::http::{header, StatusCode};
use serde_json::json;

use blackink::config::AuthConfig;
use blackink::web::auth::derive_token;
use common::*;

// ============================================================
// Login / logout
// ============================================================

#[tokio::test]
async fn login_sets_derived_token_cookie() {
    let state = test_state(Some(PASSWORD));
    let response = send(
        &state,
        json_request("POST", "/api/admin/auth", json!({ "password": PASSWORD }), None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=28800"));
    assert!(!set_cookie.contains("Secure"));

    assert_eq!(
        cookie_value(&response).unwrap(),
        derive_token(SECRET, PASSWORD).unwrap()
    );
    assert_eq!(body_json(response).await, json!({ "ok": true }));
}

#[tokio::test]
async fn secure_cookie_flag_follows_config() {
    let state = test_state(Some(PASSWORD));
    let mut auth = AuthConfig::new(Some(PASSWORD), SECRET);
    auth.secure_cookie = true;
    state.reload_auth(auth).await;

    let response = send(
        &state,
        json_request("POST", "/api/admin/auth", json!({ "password": PASSWORD }), None),
    )
    .await;
    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(set_cookie.to_str().unwrap().contains("; Secure"));
}

#[tokio::test]
async fn wrong_password_is_401_without_cookie() {
    let state = test_state(Some(PASSWORD));
    let response = send(
        &state,
        json_request("POST", "/api/admin/auth", json!({ "password": "guess" }), None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(body_json(response).await["error"], "Incorrect password.");
}

#[tokio::test]
async fn login_without_configured_password_is_500() {
    let state = test_state(None);
    let response = send(
        &state,
        json_request("POST", "/api/admin/auth", json!({ "password": "" }), None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn malformed_login_body_when_unconfigured_is_500() {
    let state = test_state(None);

    for body in [json!({}), json!({ "password": 5 }), json!(null)] {
        let response = send(&state, json_request("POST", "/api/admin/auth", body.clone(), None)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{body}");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    let bare = axum::http::Request::builder()
        .method("POST")
        .uri("/api/admin/auth")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&state, bare).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Admin password not configured.");
}

#[tokio::test]
async fn missing_password_when_configured_is_401() {
    let state = test_state(Some(PASSWORD));

    for body in [json!({}), json!({ "password": 5 })] {
        let response = send(&state, json_request("POST", "/api/admin/auth", body.clone(), None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{body}");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_json(response).await["error"], "Incorrect password.");
    }
}

#[tokio::test]
async fn logout_clears_cookie_without_a_session() {
    let state = test_state(Some(PASSWORD));
    let response = send(&state, json_request("POST", "/api/admin/logout", json!({}), None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("admin_token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

// ============================================================
// Gate
// ============================================================

#[tokio::test]
async fn admin_api_requires_session() {
    let state = test_state(Some(PASSWORD));
    let response = send(&state, get("/api/admin/products")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "Unauthorized." }));
}

#[tokio::test]
async fn admin_api_allows_valid_session() {
    let state = test_state(Some(PASSWORD));
    let token = login(&state).await;

    let response = send(&state, get_with_cookie("/api/admin/products", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn tampered_or_foreign_tokens_are_rejected() {
    let state = test_state(Some(PASSWORD));
    let token = login(&state).await;

    let mut tampered = token.clone();
    tampered.replace_range(0..1, if token.starts_with('0') { "1" } else { "0" });
    let foreign = derive_token("some-other-secret", PASSWORD).unwrap();

    for bad in [tampered.as_str(), foreign.as_str(), &token[..63], "garbage"] {
        let response = send(&state, get_with_cookie("/api/admin/products", bad)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "token {bad:?}");
    }
}

#[tokio::test]
async fn dashboard_without_session_redirects_to_login() {
    let state = test_state(Some(PASSWORD));

    for path in ["/admin/dashboard", "/admin/dashboard/products.html"] {
        let response = send(&state, get(path)).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/admin");
    }
}

#[tokio::test]
async fn dashboard_with_session_reaches_static_files() {
    let state = test_state(Some(PASSWORD));
    let token = login(&state).await;
    write_dashboard_page(&state);

    let response = send(&state, get_with_cookie("/admin/dashboard/index.html", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

fn write_dashboard_page(state: &blackink::web::AppState) {
    let dashboard = state.config.public_dir.join("admin").join("dashboard");
    std::fs::create_dir_all(&dashboard).unwrap();
    std::fs::write(dashboard.join("index.html"), "<h1>Dashboard</h1>").unwrap();
}

#[tokio::test]
async fn non_canonical_dashboard_paths_still_redirect() {
    let state = test_state(Some(PASSWORD));
    write_dashboard_page(&state);

    for path in [
        "/admin/dashboard/index.html",
        "/admin//dashboard/index.html",
        "/admin/%64ashboard/index.html",
        "/admin/./dashboard/index.html",
        "//admin/dashboard/index.html",
        "/admin/dashboard/./index.html",
        "/x/../admin/dashboard/index.html",
    ] {
        let response = send(&state, get(path)).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/admin", "{path}");
    }
}

#[tokio::test]
async fn non_canonical_dashboard_paths_serve_with_session() {
    let state = test_state(Some(PASSWORD));
    write_dashboard_page(&state);
    let token = login(&state).await;

    for path in ["/admin//dashboard/index.html", "/admin/%64ashboard/index.html"] {
        let response = send(&state, get_with_cookie(path, &token)).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn non_canonical_admin_api_paths_are_rejected() {
    let state = test_state(Some(PASSWORD));
    for path in ["//api/admin/products", "/api//admin/products", "/api/admin/%70roducts"] {
        let response = send(&state, get(path)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn login_page_and_storefront_are_public() {
    let state = test_state(Some(PASSWORD));

    let response = send(&state, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&state, get("/api/products")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Missing file, but not redirected: the login page path is never gated.
    let response = send(&state, get("/admin")).await;
    assert_ne!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn unknown_admin_api_paths_fail_closed() {
    let state = test_state(Some(PASSWORD));
    let response = send(&state, get("/api/admin/authors")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unconfigured_admin_rejects_every_cookie() {
    let state = test_state(None);
    let token = derive_token(SECRET, "").unwrap();

    let response = send(&state, get_with_cookie("/api/admin/products", &token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================
// Credential rotation
// ============================================================

#[tokio::test]
async fn rotating_password_invalidates_existing_sessions() {
    let state = test_state(Some(PASSWORD));
    let old_token = login(&state).await;

    state
        .reload_auth(AuthConfig::new(Some("rotated-pass"), SECRET))
        .await;

    let response = send(&state, get_with_cookie("/api/admin/products", &old_token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &state,
        json_request("POST", "/api/admin/auth", json!({ "password": PASSWORD }), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &state,
        json_request("POST", "/api/admin/auth", json!({ "password": "rotated-pass" }), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let new_token = cookie_value(&response).unwrap();
    assert_ne!(new_token, old_token);

    let response = send(&state, get_with_cookie("/api/admin/products", &new_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn rotating_secret_invalidates_existing_sessions() {
    let state = test_state(Some(PASSWORD));
    let old_token = login(&state).await;

    state
        .reload_auth(AuthConfig::new(Some(PASSWORD), "fresh-secret"))
        .await;

    let response = send(&state, get_with_cookie("/api/admin/products", &old_token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
