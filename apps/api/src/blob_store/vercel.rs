use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{BlobStore, BlobToken, StoredObject};
use crate::errors::AppError;

const API_VERSION: &str = "7";
const LIST_PAGE_LIMIT: &str = "1000";
/// Shortest tail the store's random suffix can have.
const RANDOM_SUFFIX_MIN_LEN: usize = 16;

/// `BlobStore` backed by the Vercel Blob REST API.
#[derive(Clone)]
pub struct VercelBlobClient {
    client: Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage {
    blobs: Vec<ListedBlob>,
    cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedBlob {
    url: String,
    pathname: String,
    size: u64,
    uploaded_at: DateTime<Utc>,
}

impl From<ListedBlob> for StoredObject {
    fn from(blob: ListedBlob) -> Self {
        StoredObject {
            logical_name: logical_name(&blob.pathname),
            content_url: blob.url,
            uploaded_at: blob.uploaded_at,
            size_bytes: blob.size,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PutResult {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl VercelBlobClient {
    /// `client` should already carry the configured request timeout.
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/{}", self.api_url, name)
    }

    /// Looks up the store's own record of the object at `url`.
    async fn head(&self, token: &BlobToken, url: &str) -> Result<StoredObject, AppError> {
        let response = self
            .client
            .get(&self.api_url)
            .bearer_auth(token.as_str())
            .header("x-api-version", API_VERSION)
            .query(&[("url", url)])
            .send()
            .await?;
        let blob: ListedBlob = check_status(response).await?.json().await?;
        Ok(blob.into())
    }
}

/// Strips the store's random suffix, turning `resume-<suffix>.pdf` back into
/// `resume.pdf`. Pathnames without a suffix are returned unchanged.
fn logical_name(pathname: &str) -> String {
    let (stem, extension) = match pathname.rfind('.') {
        Some(dot) => pathname.split_at(dot),
        None => (pathname, ""),
    };
    match stem.rsplit_once('-') {
        Some((base, suffix))
            if !base.is_empty()
                && suffix.len() >= RANDOM_SUFFIX_MIN_LEN
                && suffix.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!("{base}{extension}")
        }
        _ => pathname.to_string(),
    }
}

#[async_trait]
impl BlobStore for VercelBlobClient {
    async fn list(
        &self,
        token: &BlobToken,
        prefix: Option<&str>,
    ) -> Result<Vec<StoredObject>, AppError> {
        let mut objects = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page: ListPage = {
                let mut query: Vec<(&str, &str)> = vec![("limit", LIST_PAGE_LIMIT)];
                if let Some(prefix) = prefix {
                    query.push(("prefix", prefix));
                }
                if let Some(cursor) = cursor.as_deref() {
                    query.push(("cursor", cursor));
                }

                let response = self
                    .client
                    .get(&self.api_url)
                    .bearer_auth(token.as_str())
                    .header("x-api-version", API_VERSION)
                    .query(&query)
                    .send()
                    .await?;
                check_status(response).await?.json().await?
            };
            debug!(
                "Blob list page: {} objects, has_more={}",
                page.blobs.len(),
                page.has_more
            );
            objects.extend(page.blobs.into_iter().map(StoredObject::from));

            match page.cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(objects)
    }

    async fn put(
        &self,
        token: &BlobToken,
        name: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, AppError> {
        // Every upload lands at a fresh URL; earlier uploads stay readable.
        let response = self
            .client
            .put(self.object_url(name))
            .bearer_auth(token.as_str())
            .header("x-api-version", API_VERSION)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", "1")
            .body(bytes)
            .send()
            .await?;

        let result: PutResult = check_status(response).await?.json().await?;

        // The put response has no upload time; read it back from the store so
        // it matches what later listings report.
        let stored = self.head(token, &result.url).await?;
        debug!("Stored {} as {}", name, stored.content_url);
        Ok(stored)
    }

    async fn fetch(&self, object: &StoredObject) -> Result<Bytes, AppError> {
        let response = self.client.get(&object.content_url).send().await?;
        Ok(check_status(response).await?.bytes().await?)
    }
}

/// Maps non-success storage responses onto the error taxonomy.
async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

fn status_error(status: StatusCode, body: &str) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            // Try to parse error message
            let message = serde_json::from_str::<ApiError>(body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.to_string());
            AppError::Access {
                status: status.as_u16(),
                message,
            }
        }
        _ => AppError::Upstream {
            service: "Blob storage",
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        },
    }
}
