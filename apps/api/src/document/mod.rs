//! Document Fetcher: pulls the PDF export of the source resume document.
//!
//! The document id and export format are hardcoded; the resume has exactly
//! one source and requests never choose it.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client};
use tracing::debug;

use crate::errors::AppError;

#[cfg(test)]
pub mod scripted;

pub const DOCUMENT_ID: &str = "1c2gXIFkuPz5HlN5NWuTrSx8-jCarH17e7IpN_EcGyqo";
const EXPORT_FORMAT: &str = "pdf";
/// The export endpoint rejects some default client identities.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Returns the raw exported bytes. Never retries.
    async fn fetch_document(&self, document_id: &str) -> Result<Bytes, AppError>;
}

pub fn export_url(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{document_id}/export?format={EXPORT_FORMAT}")
}

/// `DocumentSource` backed by the Google Docs export endpoint.
#[derive(Clone)]
pub struct ExportFetcher {
    client: Client,
}

impl ExportFetcher {
    /// `client` should already carry the configured request timeout.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentSource for ExportFetcher {
    async fn fetch_document(&self, document_id: &str) -> Result<Bytes, AppError> {
        let url = export_url(document_id);
        debug!("Fetching document export from {url}");

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                service: "Document export",
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(response.bytes().await?)
    }
}
