// Storefront product handlers.
//
//   GET /api/products         filtered/sorted catalog (?category=&tag=&price=&in_stock=&sort=)
//   GET /api/products/home    products flagged for the home page
//   GET /api/products/{id}    single product detail
//   GET /api/search?q=        quick search (max 8 hits)
//
// Filtering happens in Rust after loading the whole collection; the catalog
// is small and the store has no query language for it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::error;

use crate::catalog::{self, ProductFilter};
use crate::db::models::Product;
use crate::web::{api_error, AppState};

#[derive(Deserialize, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /api/products: catalog with optional filters.
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Response {
    let products = match load_all(&state).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let categories = catalog::categories(&products);
    let filtered = filter.apply(&products);

    Json(serde_json::json!({
        "products": filtered,
        "total": filtered.len(),
        "categories": categories,
        "filters_active": filter.is_active(),
    }))
    .into_response()
}

/// GET /api/products/home: products shown on the home page.
pub async fn home_products(State(state): State<AppState>) -> Response {
    match load_all(&state).await {
        Ok(products) => Json(catalog::home_products(&products)).into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/products/{id}: single product.
pub async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.db.get_product(&id).await {
        Ok(Some(product)) => Json(product).into_response(),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Product not found."),
        Err(e) => {
            error!(error = %e, id = %id, "DB error fetching product");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch product.")
        }
    }
}

/// GET /api/search: case-insensitive search over title, category, description.
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Json(serde_json::json!({ "results": [] })).into_response();
    }

    match load_all(&state).await {
        Ok(products) => {
            let results = catalog::search(&products, &query);
            Json(serde_json::json!({ "results": results })).into_response()
        }
        Err(resp) => resp,
    }
}

async fn load_all(state: &AppState) -> Result<Vec<Product>, Response> {
    state.db.list_products().await.map_err(|e| {
        error!(error = %e, "DB error listing products");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch products.")
    })
}
