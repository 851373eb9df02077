use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::DocumentSource;
use crate::errors::AppError;

/// `DocumentSource` that replays queued outcomes in order, one per fetch.
pub struct ScriptedDocument {
    outcomes: Mutex<VecDeque<Result<Bytes, AppError>>>,
    calls: AtomicUsize,
}

impl ScriptedDocument {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_bytes(&self, bytes: impl Into<Bytes>) -> &Self {
        self.outcomes.lock().unwrap().push_back(Ok(bytes.into()));
        self
    }

    pub fn push_status(&self, status: u16, reason: &str) -> &Self {
        self.outcomes.lock().unwrap().push_back(Err(AppError::Upstream {
            service: "Document export",
            status,
            reason: reason.to_string(),
        }));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for ScriptedDocument {
    async fn fetch_document(&self, _document_id: &str) -> Result<Bytes, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(AppError::Upstream {
                    service: "Document export",
                    status: 503,
                    reason: "No scripted response".to_string(),
                })
            })
    }
}
