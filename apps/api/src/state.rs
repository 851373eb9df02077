use std::sync::Arc;

use crate::blob_store::BlobStore;
use crate::config::Config;
use crate::document::DocumentSource;
use crate::sync::SyncJob;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Object storage holding every resume upload.
    pub store: Arc<dyn BlobStore>,
    /// Source of the resume PDF. Only the sync job reads from it.
    pub source: Arc<dyn DocumentSource>,
}

impl AppState {
    pub fn sync_job(&self) -> SyncJob<'_> {
        SyncJob::new(&self.config, self.store.as_ref(), self.source.as_ref())
    }
}
