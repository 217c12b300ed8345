//! Image uploads for product and event editors.
//!
//! `POST /uploads` takes a multipart `file` field, stores it and answers with
//! its public URL: JSON for scripts, or the editor's image field pre-filled
//! when the request comes from htmx.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Multipart, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware::RequireAdmin,
    state::AppState,
};

/// Largest accepted image.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Folder inside the bucket that editor uploads go to.
const UPLOAD_PREFIX: &str = "uploads";

/// JSON answer for `/uploads`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// The editor's image URL field, swapped in after an htmx upload.
#[derive(Template, WebTemplate)]
#[template(path = "partials/image_field.html")]
pub struct ImageFieldTemplate {
    pub url: String,
}

struct Upload {
    bytes: Vec<u8>,
    content_type: String,
    file_name: Option<String>,
}

/// Store an uploaded image and return its URL.
///
/// # Errors
///
/// Returns 503 without storage configuration, 400 for missing, oversized or
/// non-image files, and 502 when the storage API refuses the upload.
#[instrument(skip(_admin, state, headers, multipart))]
pub async fn upload(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response> {
    let storage = state
        .storage()
        .ok_or_else(|| AppError::Unavailable("Image storage is not configured".to_string()))?;

    let upload = read_file_field(multipart).await?;
    let path = object_path(&upload.content_type, upload.file_name.as_deref());
    let url = storage
        .upload(&path, upload.bytes, &upload.content_type)
        .await?;
    tracing::info!(%path, "Image uploaded");

    if headers.contains_key("hx-request") {
        Ok(ImageFieldTemplate { url }.into_response())
    } else {
        Ok(Json(UploadResponse { url }).into_response())
    }
}

async fn read_file_field(mut multipart: Multipart) -> Result<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("unreadable upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_owned();
        if !content_type.starts_with("image/") {
            return Err(AppError::BadRequest("only images can be uploaded".to_string()));
        }
        let file_name = field.file_name().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("unreadable upload: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("the file is empty".to_string()));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::BadRequest(format!(
                "images are limited to {} MB",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }
        return Ok(Upload {
            bytes: bytes.to_vec(),
            content_type,
            file_name,
        });
    }
    Err(AppError::BadRequest("missing file field".to_string()))
}

/// A fresh object name so uploads never overwrite each other. Keeps the
/// original extension when it is a plain one.
fn object_path(content_type: &str, file_name: Option<&str>) -> String {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });
    let ext = from_name.unwrap_or_else(|| {
        match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "image/svg+xml" => "svg",
            _ => "bin",
        }
        .to_owned()
    });
    format!("{UPLOAD_PREFIX}/{}.{ext}", Uuid::new_v4())
}
