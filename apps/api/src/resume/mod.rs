//! Resume reads: the PDF itself (`/resume`) and its metadata (`/api/resume-url`).
//!
//! Both resolve the current object through `current_resume`, so concurrent
//! readers agree on which upload is current.

use crate::blob_store::{resolve_current, BlobStore, StoredObject};
use crate::config::Config;
use crate::errors::AppError;

pub mod handlers;
pub mod validators;

pub use validators::CacheValidators;

/// Resolves the credential, then the newest object under the configured name.
pub async fn current_resume(
    config: &Config,
    store: &dyn BlobStore,
) -> Result<StoredObject, AppError> {
    let token = config.blob_token()?;
    resolve_current(store, token, &config.object_name).await
}
