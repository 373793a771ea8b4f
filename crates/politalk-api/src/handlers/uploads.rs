//! Image upload handler
//!
//! The raw request body is the file. The name comes from `x-filename`,
//! the type from `Content-Type`. Errors are plain text.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use politalk_service::dto::UploadResponse;
use politalk_service::{UploadError, UploadService};

use crate::response::UploadRejection;
use crate::state::AppState;

/// Header carrying the original file name
pub const FILENAME_HEADER: &str = "x-filename";

/// POST /uploads
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadResponse>, UploadRejection> {
    let filename = headers
        .get(FILENAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(UploadError::MissingData)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let service = UploadService::new(state.service_context());
    let response = service
        .upload_image(filename, content_type, &body)
        .await?;
    Ok(Json(response))
}
