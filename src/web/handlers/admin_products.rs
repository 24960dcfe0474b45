// Admin product CRUD: all routes sit behind the admin session gate.
//
//   GET    /api/admin/products        every product, store order
//   POST   /api/admin/products        create (title and price required)
//   PUT    /api/admin/products/{id}   merge the body into the stored product
//   DELETE /api/admin/products/{id}   remove

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{error, info};

use crate::catalog::draft::{new_product_id, DraftError, NewProduct};
use crate::web::{api_error, AppState};

/// Attempts at finding an unused generated id before giving up.
const ID_ATTEMPTS: u32 = 3;

/// GET /api/admin/products
pub async fn list_products(State(state): State<AppState>) -> Response {
    match state.db.list_products().await {
        Ok(products) => Json(products).into_response(),
        Err(e) => {
            error!(error = %e, "DB error listing products");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch products.")
        }
    }
}

/// POST /api/admin/products: 201 with the stored product.
pub async fn create_product(State(state): State<AppState>, Json(draft): Json<NewProduct>) -> Response {
    let mut product = match draft.into_product(new_product_id(0)) {
        Ok(p) => p,
        Err(e) => return api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    for attempt in 0..ID_ATTEMPTS {
        if attempt > 0 {
            product.id = new_product_id(attempt);
        }
        match state.db.insert_product(&product).await {
            Ok(true) => {
                info!(id = %product.id, title = %product.title, "Product created");
                return (StatusCode::CREATED, Json(product)).into_response();
            }
            Ok(false) => continue,
            Err(e) => {
                error!(error = %e, "DB error creating product");
                break;
            }
        }
    }
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create product.")
}

/// PUT /api/admin/products/{id}: 200 with the updated product.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Response {
    match state.db.update_product(&id, patch).await {
        Ok(Some(updated)) => {
            info!(id = %id, "Product updated");
            Json(updated).into_response()
        }
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Product not found."),
        Err(e) => match e.downcast_ref::<DraftError>() {
            Some(invalid) => api_error(StatusCode::BAD_REQUEST, &invalid.to_string()),
            None => {
                error!(error = %e, id = %id, "DB error updating product");
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update product.")
            }
        },
    }
}

/// DELETE /api/admin/products/{id}
pub async fn delete_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.db.delete_product(&id).await {
        Ok(true) => {
            info!(id = %id, "Product deleted");
            Json(serde_json::json!({ "ok": true })).into_response()
        }
        Ok(false) => api_error(StatusCode::NOT_FOUND, "Product not found."),
        Err(e) => {
            error!(error = %e, id = %id, "DB error deleting product");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete product.")
        }
    }
}
