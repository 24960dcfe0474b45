// POST /api/contact: storefront contact form.
//
// Invalid submissions get 400 with a per-field error map so the form can
// mark every bad field in one round-trip.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info};

use crate::contact::ContactSubmission;
use crate::web::{api_error, AppState};

pub async fn submit(State(state): State<AppState>, Json(body): Json<ContactSubmission>) -> Response {
    if let Err(fields) = body.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "Invalid contact submission.",
                "fields": fields,
            })),
        )
            .into_response();
    }

    match state.db.insert_contact_message(&body).await {
        Ok(id) => {
            info!(id, subject = %body.subject.trim(), "Contact message received");
            (StatusCode::CREATED, Json(serde_json::json!({ "ok": true }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "DB error storing contact message");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message.")
        }
    }
}
