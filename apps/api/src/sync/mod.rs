//! Sync Job: copies the current document export into blob storage.
//!
//! Each successful run appends one object under the configured logical name;
//! that object becomes current as soon as the store acknowledges the put.
//! A failed run leaves the store untouched.

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::blob_store::BlobStore;
use crate::config::Config;
use crate::document::{DocumentSource, DOCUMENT_ID};
use crate::errors::AppError;

pub mod handlers;
pub mod scheduler;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// What started a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Scheduled,
    Manual,
}

impl Trigger {
    /// Wire name reported in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Scheduled => "automated",
            Trigger::Manual => "manual",
        }
    }

    /// How the trigger is described in human-readable messages.
    pub fn via(self) -> &'static str {
        match self {
            Trigger::Scheduled => "cron job",
            Trigger::Manual => "manual trigger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    pub triggered_by: Trigger,
    /// Upload time of the new object, identical to its `uploaded_at`.
    pub timestamp: DateTime<Utc>,
    pub source_document_id: String,
    pub byte_size: u64,
    pub stored_url: String,
}

pub struct SyncJob<'a> {
    config: &'a Config,
    store: &'a dyn BlobStore,
    source: &'a dyn DocumentSource,
}

impl<'a> SyncJob<'a> {
    pub fn new(config: &'a Config, store: &'a dyn BlobStore, source: &'a dyn DocumentSource) -> Self {
        Self {
            config,
            store,
            source,
        }
    }

    pub async fn run(&self, trigger: Trigger) -> Result<SyncResult, AppError> {
        let result = self.run_inner(trigger).await;
        if let Err(e) = &result {
            error!("Resume update via {} failed: {e}", trigger.via());
        }
        result
    }

    async fn run_inner(&self, trigger: Trigger) -> Result<SyncResult, AppError> {
        // Fail before any network call when the credential is missing.
        let token = self.config.blob_token()?;

        info!("Resume update via {} started", trigger.via());

        let bytes = self.source.fetch_document(DOCUMENT_ID).await?;
        info!("Fetched {} bytes from document {}", bytes.len(), DOCUMENT_ID);

        let stored = self
            .store
            .put(token, &self.config.object_name, bytes, PDF_CONTENT_TYPE)
            .await?;
        info!(
            "Stored {} ({} bytes) at {}",
            stored.logical_name, stored.size_bytes, stored.content_url
        );

        Ok(SyncResult {
            triggered_by: trigger,
            timestamp: stored.uploaded_at,
            source_document_id: DOCUMENT_ID.to_string(),
            byte_size: stored.size_bytes,
            stored_url: stored.content_url,
        })
    }
}
