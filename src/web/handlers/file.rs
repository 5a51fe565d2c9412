//! File handlers for the web API.

use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::file::{self, sanitize_original_name, FileEntry, StagedUpload};
use crate::web::dto::{MessageResponse, UploadResponse, UploadedFileInfo};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::ShelfError;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Control characters are stripped, quotes and backslashes are replaced in
/// the ASCII fallback, and non-ASCII names get an RFC 5987 `filename*`.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// Map a multipart read failure, keeping body-limit hits distinct.
fn multipart_error(err: MultipartError, limit: u64) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Upload rejected: request body over limit");
        return ShelfError::PayloadTooLarge { limit }.into();
    }
    tracing::warn!("Failed to read multipart data: {}", err);
    ApiError::bad_request("invalid multipart data")
}

/// GET /api/files - List stored files.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FileEntry>>, ApiError> {
    let entries = file::list_files(&state.storage).await.map_err(|e| {
        tracing::error!("Failed to list files: {}", e);
        ApiError::internal("failed to read storage directory")
    })?;

    Ok(Json(entries))
}

/// POST /api/upload - Upload a single file.
///
/// Request body: multipart/form-data with a `file` part. Other parts are
/// ignored and only the first `file` part is stored.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let limit = state.max_upload_size;
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Upload without multipart body: {}", e);
        ApiError::from(ShelfError::Validation("no file sent".to_string()))
    })?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(raw_name) = field.file_name().filter(|n| !n.is_empty()) else {
            continue;
        };

        let original_name = sanitize_original_name(raw_name)?;
        let mimetype = field
            .content_type()
            .map(str::to_owned)
            .unwrap_or_else(|| {
                mime_guess::from_path(&original_name)
                    .first_or_octet_stream()
                    .to_string()
            });

        let mut staged = StagedUpload::create(&state.storage, limit).await?;
        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
            staged.write_chunk(&chunk).await?;
        }
        let stored = staged.commit(&state.storage, &original_name).await?;

        tracing::info!(
            original = %original_name,
            stored = %stored.stored_name,
            size = stored.size,
            "File uploaded"
        );

        return Ok(Json(UploadResponse {
            message: "file uploaded".to_string(),
            file: UploadedFileInfo::new(original_name, stored, mimetype),
        }));
    }

    Err(ShelfError::Validation("no file sent".to_string()).into())
}

/// GET /api/download/:filename - Download a file as an attachment.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let path = state.storage.resolve(&filename)?;

    let stat = state.storage.stat_entry(&filename).await?;
    if stat.is_directory {
        return Err(ApiError::bad_request("path is a directory"));
    }

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::not_found("file not found")
        } else {
            ShelfError::storage(format!("open {filename}"), e).into()
        }
    })?;
    let size = file
        .metadata()
        .await
        .map_err(|e| ApiError::from(ShelfError::storage(format!("stat {filename}"), e)))?
        .len();

    let content_type = mime_guess::from_path(&filename)
        .first_or_octet_stream()
        .to_string();

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&filename),
        )
        .header(header::CONTENT_LENGTH, size)
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("failed to build response")
        })?;

    Ok(response)
}

/// DELETE /api/delete/:filename - Delete a file.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.storage.delete_entry(&filename).await {
        Ok(()) => {
            tracing::info!(name = %filename, "File deleted");
            Ok(Json(MessageResponse::new("file deleted")))
        }
        Err(ShelfError::IsDirectory(_)) => {
            Err(ApiError::bad_request("directories cannot be deleted"))
        }
        Err(ShelfError::Storage { context, source }) => {
            tracing::error!("Failed to delete {}: {}: {}", filename, context, source);
            Err(ApiError::internal("failed to delete file"))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_header_simple_ascii() {
        let result = content_disposition_header("1700000000000-1-report.txt");
        assert_eq!(result, "attachment; filename=\"1700000000000-1-report.txt\"");
    }

    #[test]
    fn test_content_disposition_header_with_spaces() {
        let result = content_disposition_header("my report.txt");
        assert_eq!(result, "attachment; filename=\"my report.txt\"");
    }

    #[test]
    fn test_content_disposition_header_non_ascii() {
        let result = content_disposition_header("relatório.pdf");
        assert!(result.starts_with("attachment; filename=\""));
        assert!(result.contains("filename*=UTF-8''rela"));
        assert!(result.contains("%C3%B3"));
    }

    #[test]
    fn test_content_disposition_header_quotes_and_backslashes() {
        let result = content_disposition_header("a\"b\\c.txt");
        assert!(result.contains("filename=\"a_b_c.txt\""));
        assert!(result.contains("%22"));
    }

    #[test]
    fn test_content_disposition_header_control_characters() {
        let result = content_disposition_header("test\r\nX-Injected: bad.txt");
        assert!(!result.contains('\r'));
        assert!(!result.contains('\n'));
        assert!(result.starts_with("attachment; filename="));
    }
}
