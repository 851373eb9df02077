use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use crate::errors::AppError;
use crate::http_time::to_json_timestamp;
use crate::models::resume::SyncResponse;
use crate::state::AppState;
use crate::sync::{SyncResult, Trigger};

/// A failed sync, rendered as `{error, details, kind, timestamp, type}` with 500.
#[derive(Debug)]
pub struct SyncError {
    pub trigger: Trigger,
    pub source: AppError,
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": format!("Failed to update resume via {}", self.trigger.via()),
            "details": self.source.to_string(),
            "kind": self.source.kind(),
            "timestamp": to_json_timestamp(Utc::now()),
            "type": self.trigger.as_str(),
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<SyncResult> for SyncResponse {
    fn from(result: SyncResult) -> Self {
        SyncResponse {
            message: format!(
                "Resume updated successfully via {}",
                result.triggered_by.via()
            ),
            timestamp: to_json_timestamp(result.timestamp),
            doc_id: result.source_document_id,
            trigger: result.triggered_by.as_str(),
            size: result.byte_size,
            blob_url: result.stored_url,
        }
    }
}

async fn run(state: &AppState, trigger: Trigger) -> Result<Json<SyncResponse>, SyncError> {
    state
        .sync_job()
        .run(trigger)
        .await
        .map(|result| Json(SyncResponse::from(result)))
        .map_err(|source| SyncError { trigger, source })
}

/// GET /api/update-resume (cron)
pub async fn handle_scheduled_sync(
    State(state): State<AppState>,
) -> Result<Json<SyncResponse>, SyncError> {
    run(&state, Trigger::Scheduled).await
}

/// POST /api/update-resume
pub async fn handle_manual_sync(
    State(state): State<AppState>,
) -> Result<Json<SyncResponse>, SyncError> {
    run(&state, Trigger::Manual).await
}
