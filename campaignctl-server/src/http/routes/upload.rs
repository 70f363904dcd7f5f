//! Upload endpoints
//!
//! Files are streamed to `server.upload_dir` under `<uuid>.<ext>` and served
//! back from `server.public_upload_prefix`. A failed request removes any file
//! it already wrote.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{multipart::Field, multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use campaignctl_core::media::stored_file_name;
use campaignctl_core::{classify_mime, MediaType};

use crate::http::auth::AuthUser;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Most files accepted by `/upload/multiple`
pub const MAX_FILES: usize = 5;

/// Stored file as reported to the client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub filename: String,
    pub original_name: String,
    pub size: u64,
}

#[derive(Debug, Serialize)]
pub struct SingleUploadResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub file: UploadedFile,
}

#[derive(Debug, Serialize)]
pub struct MultipleUploadResponse {
    pub message: &'static str,
    pub files: Vec<UploadedFile>,
}

/// Where and how to store incoming files
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub dir: PathBuf,
    pub public_prefix: String,
    /// Multipart field carrying files
    pub field: &'static str,
    pub max_files: usize,
    /// Body limit, reported on 413
    pub limit: usize,
}

impl UploadTarget {
    fn from_state(state: &AppState, field: &'static str, max_files: usize) -> Self {
        let server = &state.config.server;
        Self {
            dir: server.upload_dir.clone(),
            public_prefix: server.public_upload_prefix.clone(),
            field,
            max_files,
            limit: server.max_upload_bytes,
        }
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.public_prefix.trim_end_matches('/'), filename)
    }
}

/// Receive every file in `target.field`; other fields are skipped.
pub async fn receive_files(
    mut multipart: Multipart,
    target: &UploadTarget,
) -> Result<Vec<UploadedFile>, ApiError> {
    let mut saved: Vec<UploadedFile> = Vec::new();

    let result = async {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, target.limit))?
        {
            if field.name() != Some(target.field) {
                continue;
            }
            if saved.len() == target.max_files {
                return Err(ApiError::bad_request(if target.max_files == 1 {
                    format!("Only one '{}' file is accepted", target.field)
                } else {
                    format!("Too many files (max {})", target.max_files)
                }));
            }
            let file = save_field(field, target).await?;
            tracing::debug!(filename = %file.filename, size = file.size, "file stored");
            saved.push(file);
        }
        Ok::<(), ApiError>(())
    }
    .await;

    if let Err(e) = result {
        remove_files(&target.dir, &saved).await;
        return Err(e);
    }
    Ok(saved)
}

/// Stream one field to disk. A partial file is removed on failure.
async fn save_field(mut field: Field<'_>, target: &UploadTarget) -> Result<UploadedFile, ApiError> {
    let original_name = field.file_name().unwrap_or_default().to_owned();
    let media_type = classify_mime(field.content_type());
    let filename = stored_file_name(&Uuid::new_v4().to_string(), &original_name);
    let path = target.dir.join(&filename);

    let mut out = tokio::fs::File::create(&path)
        .await
        .map_err(ApiError::internal)?;
    let mut size: u64 = 0;

    let written = async {
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, target.limit))?
        {
            size += chunk.len() as u64;
            out.write_all(&chunk).await.map_err(ApiError::internal)?;
        }
        out.flush().await.map_err(ApiError::internal)?;
        Ok::<(), ApiError>(())
    }
    .await;

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&path).await;
        return Err(e);
    }

    Ok(UploadedFile {
        url: target.public_url(&filename),
        media_type,
        filename,
        original_name,
        size,
    })
}

async fn remove_files(dir: &Path, files: &[UploadedFile]) {
    for file in files {
        if let Err(e) = tokio::fs::remove_file(dir.join(&file.filename)).await {
            tracing::warn!(filename = %file.filename, "failed to remove partial upload: {}", e);
        }
    }
}

fn multipart_error(e: MultipartError, limit: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        ApiError::bad_request(e.body_text())
    }
}

fn single_response(mut files: Vec<UploadedFile>) -> Result<Json<SingleUploadResponse>, ApiError> {
    let file = files
        .pop()
        .ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    Ok(Json(SingleUploadResponse {
        message: "File uploaded successfully",
        file,
    }))
}

fn multiple_response(files: Vec<UploadedFile>) -> Result<Json<MultipleUploadResponse>, ApiError> {
    if files.is_empty() {
        return Err(ApiError::bad_request("No files uploaded"));
    }
    Ok(Json(MultipleUploadResponse {
        message: "Files uploaded successfully",
        files,
    }))
}

/// POST /upload/single - field `file`
async fn upload_single(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<SingleUploadResponse>, ApiError> {
    let target = UploadTarget::from_state(&state, "file", 1);
    let response = single_response(receive_files(multipart, &target).await?)?;
    tracing::info!(filename = %response.file.filename, size = response.file.size, "file uploaded");
    Ok(response)
}

/// POST /upload/multiple - up to five `files` fields
async fn upload_multiple(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<MultipleUploadResponse>, ApiError> {
    let target = UploadTarget::from_state(&state, "files", MAX_FILES);
    let response = multiple_response(receive_files(multipart, &target).await?)?;
    tracing::info!(count = response.files.len(), "files uploaded");
    Ok(response)
}

/// Upload routes, with the body limit raised to `max_bytes`
pub fn router(max_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload/single", post(upload_single))
        .route("/upload/multiple", post(upload_multiple))
        .layer(DefaultBodyLimit::max(max_bytes))
}
