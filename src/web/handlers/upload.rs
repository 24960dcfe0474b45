// POST /api/admin/upload: save an admin image upload under the uploads dir.
//
// Body: multipart/form-data with a single "file" field. The stored name is
// `<unix millis>_<sanitised original name>`, so two uploads never collide and
// the original name can't escape the uploads directory.

use std::sync::LazyLock;

use anyhow::Context;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use regex_lite::Regex;
use tracing::{error, info, warn};

use crate::web::{api_error, AppState};

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9._-]").expect("Invalid regex pattern for filename sanitising")
});

/// Replace every character outside `[a-zA-Z0-9._-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(name, "_").into_owned();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

struct UploadedFile {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// POST /api/admin/upload: 201 `{ url }` on success.
pub async fn upload_image(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let file = match read_file_field(&mut multipart).await {
        Ok(Some(file)) => file,
        Ok(None) => return api_error(StatusCode::BAD_REQUEST, "No file provided."),
        Err(e) => {
            warn!(error = %e, "Malformed upload body");
            return api_error(StatusCode::BAD_REQUEST, "No file provided.");
        }
    };

    if !file.content_type.starts_with("image/") {
        return api_error(StatusCode::BAD_REQUEST, "Only image files are allowed.");
    }

    let filename = format!(
        "{}_{}",
        chrono::Utc::now().timestamp_millis(),
        sanitize_filename(&file.file_name)
    );

    match store(&state, &filename, &file.bytes).await {
        Ok(()) => {
            info!(file = %filename, size = file.bytes.len(), "Image uploaded");
            (
                StatusCode::CREATED,
                Json(serde_json::json!({ "url": format!("/uploads/{filename}") })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Upload failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Upload failed.")
        }
    }
}

/// Pull the "file" field out of the multipart body, skipping any others.
async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<UploadedFile>, axum::extract::multipart::MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?.to_vec();
        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

async fn store(state: &AppState, filename: &str, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = &state.config.uploads_dir;
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create uploads directory {}", dir.display()))?;
    let path = dir.join(filename);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
