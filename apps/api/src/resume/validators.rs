use axum::http::{header, HeaderMap};

use crate::blob_store::StoredObject;
use crate::http_time::{parse_http_date, to_http_date};

/// Validators derived from an object's upload time. Nothing here is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheValidators {
    /// Strong, quoted entity tag: `"<uploaded_at millis>"`.
    pub etag: String,
    pub last_modified: String,
    /// Upload time in whole seconds, the precision of `Last-Modified`.
    last_modified_secs: i64,
}

impl CacheValidators {
    pub fn for_object(object: &StoredObject) -> Self {
        Self {
            etag: format!("\"{}\"", object.uploaded_at.timestamp_millis()),
            last_modified: to_http_date(object.uploaded_at),
            last_modified_secs: object.uploaded_at.timestamp(),
        }
    }

    /// True when the request's preconditions show the client already holds
    /// this version. `If-None-Match` takes precedence; `If-Modified-Since`
    /// is only consulted without it.
    pub fn is_fresh(&self, headers: &HeaderMap) -> bool {
        if let Some(if_none_match) = header_str(headers, header::IF_NONE_MATCH) {
            return etag_matches(if_none_match, &self.etag);
        }

        header_str(headers, header::IF_MODIFIED_SINCE)
            .and_then(parse_http_date)
            .is_some_and(|since| self.last_modified_secs <= since.timestamp())
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Weak comparison over a comma-separated `If-None-Match` list.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate.trim_start_matches("W/") == etag)
}
