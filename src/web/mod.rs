// Web server: Axum backend for the storefront API and the admin panel.
//
// /api/* routes serve JSON. Everything else is served from the public
// directory (pages, images) and admin uploads are served under /uploads.
//
// Auth: one stateless HMAC-SHA256 session cookie for the single admin. The
// gate runs as a layer over the whole router, including static files, so
// /admin/dashboard pages are protected the same way as /api/admin/*.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{AuthConfig, Config};
use crate::db::Database;

pub mod auth;
pub mod handlers;

/// Largest accepted upload body (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub config: Arc<Config>,
    /// Current admin credentials. Swapped wholesale on reload; never cached
    /// in derived form.
    pub auth: Arc<RwLock<AuthConfig>>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, config: Config) -> Self {
        let auth = Arc::new(RwLock::new(config.auth.clone()));
        Self {
            db,
            config: Arc::new(config),
            auth,
        }
    }

    /// Replace the admin credentials. Sessions issued under the old password
    /// stop validating on the next request.
    pub async fn reload_auth(&self, fresh: AuthConfig) {
        *self.auth.write().await = fresh;
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(config: Config, db: Arc<dyn Database>, port: u16, bind: &str) -> Result<()> {
    let state = AppState::new(db, config);

    #[cfg(unix)]
    spawn_credential_reload(state.clone())?;

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("BlackInkkk storefront listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

/// Re-read `.env` and the environment on SIGHUP and swap in the new
/// credentials. A failed reload keeps the previous credentials.
#[cfg(unix)]
fn spawn_credential_reload(state: AppState) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    use tracing::warn;

    let mut hangup = signal(SignalKind::hangup())?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            let _ = dotenvy::dotenv_override();
            match AuthConfig::from_env() {
                Ok(fresh) => {
                    state.reload_auth(fresh).await;
                    info!("Reloaded admin credentials");
                }
                Err(e) => warn!(error = %e, "Credential reload failed; keeping previous credentials"),
            }
        }
    });
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    // Admin API. Login/logout stay public; the gate below guards the rest.
    let admin_api = Router::new()
        .route("/api/admin/auth", post(handlers::auth::login))
        .route("/api/admin/logout", post(handlers::auth::logout))
        .route(
            "/api/admin/products",
            get(handlers::admin_products::list_products)
                .post(handlers::admin_products::create_product),
        )
        .route(
            "/api/admin/products/{id}",
            put(handlers::admin_products::update_product)
                .delete(handlers::admin_products::delete_product),
        )
        .route(
            "/api/admin/upload",
            post(handlers::upload::upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        );

    // Storefront API (no auth)
    let storefront_api = Router::new()
        .route("/health", get(health))
        .route("/api/products", get(handlers::products::list_products))
        .route("/api/products/home", get(handlers::products::home_products))
        .route("/api/products/{id}", get(handlers::products::get_product))
        .route("/api/search", get(handlers::products::search_products))
        .route("/api/contact", post(handlers::contact::submit));

    let uploads = ServeDir::new(&state.config.uploads_dir);
    let pages = ServeDir::new(&state.config.public_dir);

    Router::new()
        .merge(admin_api)
        .merge(storefront_api)
        .nest_service("/uploads", uploads)
        .fallback_service(pages)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check: always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
