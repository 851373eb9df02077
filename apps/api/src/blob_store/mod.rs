//! Blob Store: the object-storage seam of the resume pipeline.
//!
//! Every component that touches storage goes through the `BlobStore` trait,
//! and every reader picks "the current resume" through `select_current`.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::errors::AppError;

#[cfg(test)]
pub mod memory;
pub mod vercel;

pub use vercel::VercelBlobClient;

/// Storage credential, resolved once by the caller and passed to each call.
#[derive(Clone, PartialEq, Eq)]
pub struct BlobToken(String);

impl BlobToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BlobToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlobToken(***)")
    }
}

/// One immutable upload. Several objects may share a `logical_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub logical_name: String,
    pub content_url: String,
    pub uploaded_at: DateTime<Utc>,
    pub size_bytes: u64,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Enumerates stored objects. `prefix` narrows the listing store-side;
    /// `None` lists everything.
    async fn list(
        &self,
        token: &BlobToken,
        prefix: Option<&str>,
    ) -> Result<Vec<StoredObject>, AppError>;

    /// Uploads `bytes` under `name`. The returned object becomes current for
    /// that name once this call succeeds.
    async fn put(
        &self,
        token: &BlobToken,
        name: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, AppError>;

    /// Downloads the bytes of a previously listed object.
    async fn fetch(&self, object: &StoredObject) -> Result<Bytes, AppError>;
}

/// Picks the object with the greatest `uploaded_at` among those named `name`.
///
/// On equal timestamps the object listed last wins.
pub fn select_current<'a>(objects: &'a [StoredObject], name: &str) -> Option<&'a StoredObject> {
    objects
        .iter()
        .filter(|object| object.logical_name == name)
        .max_by_key(|object| object.uploaded_at)
}

/// Store-side listing prefix for `name`: everything before the extension, so
/// suffixed uploads such as `resume-<suffix>.pdf` are still listed.
pub fn listing_prefix(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

/// Lists `name` store-side and resolves its current object.
///
/// The resume and metadata endpoints both resolve through here.
pub async fn resolve_current(
    store: &dyn BlobStore,
    token: &BlobToken,
    name: &str,
) -> Result<StoredObject, AppError> {
    let objects = store.list(token, Some(listing_prefix(name))).await?;
    select_current(&objects, name)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Resume not found in blob storage".to_string()))
}
