use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{BlobStore, BlobToken, StoredObject};
use crate::errors::AppError;

pub const TEST_TOKEN: &str = "vercel_blob_rw_test";

/// In-memory `BlobStore` with a deterministic clock: every `put` is stamped
/// one second after the previous one.
pub struct MemoryBlobStore {
    inner: Mutex<Inner>,
}

struct Inner {
    objects: Vec<(StoredObject, Bytes)>,
    clock: DateTime<Utc>,
    fail_fetch: Option<u16>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                objects: Vec::new(),
                clock: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                fail_fetch: None,
            }),
        }
    }

    /// Seeds an object with an explicit upload time.
    pub fn insert(&self, name: &str, uploaded_at: DateTime<Utc>, bytes: Bytes) -> StoredObject {
        let mut inner = self.inner.lock().unwrap();
        let object = StoredObject {
            logical_name: name.to_string(),
            content_url: format!("memory://{}/{}", inner.objects.len(), name),
            uploaded_at,
            size_bytes: bytes.len() as u64,
        };
        inner.objects.push((object.clone(), bytes));
        object
    }

    /// Makes every subsequent `fetch` fail with the given HTTP status.
    pub fn fail_fetch_with(&self, status: u16) {
        self.inner.lock().unwrap().fail_fetch = Some(status);
    }

    pub fn object_count(&self) -> usize {
        self.inner.lock().unwrap().objects.len()
    }

    fn authorize(token: &BlobToken) -> Result<(), AppError> {
        if token.as_str() == TEST_TOKEN {
            Ok(())
        } else {
            Err(AppError::Access {
                status: 403,
                message: "Access denied, please provide a valid token".to_string(),
            })
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn list(
        &self,
        token: &BlobToken,
        prefix: Option<&str>,
    ) -> Result<Vec<StoredObject>, AppError> {
        Self::authorize(token)?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .objects
            .iter()
            .map(|(object, _)| object)
            .filter(|object| prefix.map_or(true, |p| object.logical_name.starts_with(p)))
            .cloned()
            .collect())
    }

    async fn put(
        &self,
        token: &BlobToken,
        name: &str,
        bytes: Bytes,
        _content_type: &str,
    ) -> Result<StoredObject, AppError> {
        Self::authorize(token)?;
        let uploaded_at = {
            let mut inner = self.inner.lock().unwrap();
            inner.clock = inner.clock + Duration::seconds(1);
            inner.clock
        };
        Ok(self.insert(name, uploaded_at, bytes))
    }

    async fn fetch(&self, object: &StoredObject) -> Result<Bytes, AppError> {
        let inner = self.inner.lock().unwrap();
        if let Some(status) = inner.fail_fetch {
            return Err(AppError::Upstream {
                service: "Blob storage",
                status,
                reason: "Injected failure".to_string(),
            });
        }
        inner
            .objects
            .iter()
            .find(|(stored, _)| stored.content_url == object.content_url)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| AppError::Upstream {
                service: "Blob storage",
                status: 404,
                reason: "Not Found".to_string(),
            })
    }
}
