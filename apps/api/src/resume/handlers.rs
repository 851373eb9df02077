use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::errors::AppError;
use crate::http_time::to_json_timestamp;
use crate::models::resume::ResumeMetadata;
use crate::resume::{current_resume, CacheValidators};
use crate::state::AppState;
use crate::sync::PDF_CONTENT_TYPE;

const CONTENT_DISPOSITION: &str = "inline; filename=resume.pdf";

/// A failed resume read. Always carries the static fallback hint so the
/// front end can link somewhere useful.
#[derive(Debug)]
pub struct ReadError {
    pub source: AppError,
    pub fallback_url: String,
}

impl ReadError {
    pub fn new(source: AppError, fallback_url: &str) -> Self {
        Self {
            source,
            fallback_url: fallback_url.to_string(),
        }
    }
}

impl IntoResponse for ReadError {
    fn into_response(self) -> Response {
        let status = self.source.status();
        if status.is_server_error() {
            error!("Resume read failed: {}", self.source);
        } else {
            warn!("Resume read: {}", self.source);
        }

        let body = Json(json!({
            "error": self.source.to_string(),
            "kind": self.source.kind(),
            "fallbackUrl": self.fallback_url,
        }));

        (status, body).into_response()
    }
}

/// GET /resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ReadError> {
    let config = &state.config;
    let current = current_resume(config, state.store.as_ref())
        .await
        .map_err(|e| ReadError::new(e, &config.fallback_url))?;

    let validators = CacheValidators::for_object(&current);
    let cache_control = format!(
        "public, max-age={}, must-revalidate",
        config.cache_max_age_secs
    );

    if validators.is_fresh(&headers) {
        debug!("Resume {} not modified", validators.etag);
        return Ok((
            StatusCode::NOT_MODIFIED,
            [
                (header::ETAG, validators.etag),
                (header::CACHE_CONTROL, cache_control),
                (header::LAST_MODIFIED, validators.last_modified),
            ],
        )
            .into_response());
    }

    let bytes = state
        .store
        .fetch(&current)
        .await
        .map_err(|e| ReadError::new(e, &config.fallback_url))?;

    Ok((
        [
            (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, CONTENT_DISPOSITION.to_string()),
            (header::CACHE_CONTROL, cache_control),
            (header::ETAG, validators.etag),
            (header::LAST_MODIFIED, validators.last_modified),
        ],
        bytes,
    )
        .into_response())
}

/// GET /api/resume-url
pub async fn handle_get_metadata(
    State(state): State<AppState>,
) -> Result<Json<ResumeMetadata>, ReadError> {
    let current = current_resume(&state.config, state.store.as_ref())
        .await
        .map_err(|e| ReadError::new(e, &state.config.fallback_url))?;

    Ok(Json(ResumeMetadata {
        url: current.content_url,
        last_updated: to_json_timestamp(current.uploaded_at),
        size: current.size_bytes,
    }))
}
