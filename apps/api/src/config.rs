use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::blob_store::BlobToken;
use crate::errors::AppError;

const DEFAULT_BLOB_API_URL: &str = "https://blob.vercel-storage.com";
const DEFAULT_OBJECT_NAME: &str = "resume.pdf";
const DEFAULT_FALLBACK_URL: &str = "/resume.pdf";

/// Application configuration, built once at startup and shared by reference.
///
/// A missing storage credential does not prevent startup; every endpoint
/// reports it as a `ConfigurationError`.
#[derive(Debug, Clone)]
pub struct Config {
    pub blob_token: Option<BlobToken>,
    pub blob_api_url: String,
    /// Logical name under which every resume upload is stored and looked up.
    pub object_name: String,
    pub fallback_url: String,
    pub cache_max_age_secs: u64,
    pub http_timeout_secs: u64,
    /// `None` leaves scheduled syncs to an external cron hitting the HTTP trigger.
    pub sync_interval_secs: Option<u64>,
    pub sync_retry_attempts: u32,
    pub sync_retry_backoff_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let object_name = lookup("RESUME_OBJECT_NAME")
            .unwrap_or_else(|| DEFAULT_OBJECT_NAME.to_string());
        if object_name.trim().is_empty() || object_name.contains('/') {
            bail!("RESUME_OBJECT_NAME must be a non-empty name without '/', got '{object_name}'");
        }

        Ok(Config {
            blob_token: lookup("BLOB_READ_WRITE_TOKEN")
                .filter(|token| !token.trim().is_empty())
                .map(BlobToken::new),
            blob_api_url: lookup("BLOB_API_URL")
                .unwrap_or_else(|| DEFAULT_BLOB_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            object_name,
            fallback_url: lookup("RESUME_FALLBACK_URL")
                .unwrap_or_else(|| DEFAULT_FALLBACK_URL.to_string()),
            cache_max_age_secs: parse_or(&lookup, "RESUME_CACHE_MAX_AGE_SECS", 300)?,
            http_timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30)?,
            sync_interval_secs: parse_optional::<_, u64>(&lookup, "SYNC_INTERVAL_SECS")?
                .filter(|secs| *secs > 0),
            sync_retry_attempts: parse_or(&lookup, "SYNC_RETRY_ATTEMPTS", 0)?,
            sync_retry_backoff_secs: parse_or(&lookup, "SYNC_RETRY_BACKOFF_SECS", 5)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Resolves the storage credential, failing with a diagnosable error when absent.
    pub fn blob_token(&self) -> Result<&BlobToken, AppError> {
        self.blob_token.as_ref().ok_or_else(AppError::missing_blob_token)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
        })
        .transpose()
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse_optional(lookup, key)?.unwrap_or(default))
}
