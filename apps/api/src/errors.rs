use axum::http::StatusCode;
use thiserror::Error;

/// Failure taxonomy shared by every component of the resume pipeline.
///
/// Endpoints never render this directly; each one wraps it in its own
/// response type (`ReadError`, `SyncError`) so the JSON shape matches the
/// endpoint's contract.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or unusable configuration. Needs operator action.
    #[error("{0}")]
    Configuration(String),

    /// An external service answered with a non-success status.
    #[error("{service} returned {status} {reason}")]
    Upstream {
        service: &'static str,
        status: u16,
        reason: String,
    },

    /// The storage service rejected the credential.
    #[error("Access denied by blob storage (status {status}): {message}")]
    Access { status: u16, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AppError {
    pub fn missing_blob_token() -> Self {
        AppError::Configuration(
            "BLOB_READ_WRITE_TOKEN environment variable is not set".to_string(),
        )
    }

    /// Stable name of the error kind, exposed to clients in JSON bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "ConfigurationError",
            AppError::Upstream { .. } => "UpstreamError",
            AppError::Access { .. } => "AccessError",
            AppError::NotFound(_) => "NotFoundError",
            AppError::Transport(_) => "TransportError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether a later attempt may succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Upstream { .. } | AppError::Transport(_))
    }
}
