//! Storage diagnostics, used while setting up a deployment.
//!
//! - GET  /api/test-blob -> lists every stored object with the configured token
//! - POST /api/test-blob -> uploads a small `test.txt` object

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::errors::AppError;
use crate::http_time::to_json_timestamp;
use crate::state::AppState;

const TEST_OBJECT_NAME: &str = "test.txt";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BlobSummary {
    pathname: String,
    size: u64,
    uploaded_at: String,
}

/// Turns a failure into the diagnostics error shape, with a hint for the operator.
fn failure(message: &str, err: &AppError, token_present: bool) -> (StatusCode, Json<serde_json::Value>) {
    let suggestion = match err {
        AppError::Configuration(_) => {
            "Add BLOB_READ_WRITE_TOKEN to your .env file or deployment environment"
        }
        AppError::Access { .. } => "Invalid token - issue a new read/write token for the blob store",
        _ => "Make sure BLOB_READ_WRITE_TOKEN is set correctly and the blob store is reachable",
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": "error",
            "message": message,
            "error": err.to_string(),
            "kind": err.kind(),
            "tokenPresent": token_present,
            "suggestion": suggestion,
        })),
    )
}

/// GET /api/test-blob
pub async fn handle_check_blob(State(state): State<AppState>) -> impl IntoResponse {
    let token_present = state.config.blob_token.is_some();
    let token = match state.config.blob_token() {
        Ok(token) => token,
        Err(e) => return failure("Blob storage is not configured", &e, token_present),
    };

    match state.store.list(token, None).await {
        Ok(objects) => {
            let blobs: Vec<BlobSummary> = objects
                .into_iter()
                .map(|o| BlobSummary {
                    pathname: o.logical_name,
                    size: o.size_bytes,
                    uploaded_at: to_json_timestamp(o.uploaded_at),
                })
                .collect();
            (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "message": "Blob storage is configured correctly",
                    "blobCount": blobs.len(),
                    "tokenPresent": true,
                    "blobs": blobs,
                })),
            )
        }
        Err(e) => {
            tracing::error!("Blob storage check failed: {e}");
            failure("Blob storage configuration issue", &e, token_present)
        }
    }
}

/// POST /api/test-blob
pub async fn handle_test_upload(State(state): State<AppState>) -> impl IntoResponse {
    let token_present = state.config.blob_token.is_some();
    let token = match state.config.blob_token() {
        Ok(token) => token,
        Err(e) => return failure("Blob storage is not configured", &e, token_present),
    };

    let content = format!("Test file created at {}", to_json_timestamp(Utc::now()));
    let size = content.len();

    match state
        .store
        .put(token, TEST_OBJECT_NAME, Bytes::from(content), "text/plain")
        .await
    {
        Ok(stored) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": "Test file uploaded successfully",
                "url": stored.content_url,
                "size": size,
            })),
        ),
        Err(e) => {
            tracing::error!("Test upload failed: {e}");
            failure("Failed to upload test file", &e, token_present)
        }
    }
}
