use serde::Serialize;

/// Body of `GET /api/resume-url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMetadata {
    pub url: String,
    pub last_updated: String,
    pub size: u64,
}

/// Body of a successful `/api/update-resume` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub message: String,
    pub timestamp: String,
    pub doc_id: String,
    #[serde(rename = "type")]
    pub trigger: &'static str,
    pub size: u64,
    pub blob_url: String,
}
