pub mod diagnostics;
pub mod health;

use axum::{routing::get, Router};

use crate::resume::handlers::{handle_get_metadata, handle_get_resume};
use crate::state::AppState;
use crate::sync::handlers::{handle_manual_sync, handle_scheduled_sync};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume reads
        .route("/resume", get(handle_get_resume))
        .route("/api/resume-url", get(handle_get_metadata))
        // Sync triggers: GET for the cron, POST for manual refreshes
        .route(
            "/api/update-resume",
            get(handle_scheduled_sync).post(handle_manual_sync),
        )
        .route(
            "/api/test-blob",
            get(diagnostics::handle_check_blob).post(diagnostics::handle_test_upload),
        )
        .with_state(state)
}
