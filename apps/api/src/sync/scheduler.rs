//! In-process timer for scheduled syncs.
//!
//! Only started when `SYNC_INTERVAL_SECS` is set. The first run happens right
//! after startup. Retryable failures are retried with exponential backoff up
//! to `SYNC_RETRY_ATTEMPTS` times; anything else waits for the next tick.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::state::AppState;
use crate::sync::{SyncJob, SyncResult, Trigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            attempts: config.sync_retry_attempts,
            backoff: Duration::from_secs(config.sync_retry_backoff_secs),
        }
    }

    /// Delay before retry number `retry` (0-based): backoff, 2×backoff, 4×backoff...
    fn delay(&self, retry: u32) -> Duration {
        self.backoff.saturating_mul(1u32 << retry.min(16))
    }
}

/// Spawns the periodic sync task, or returns `None` when no interval is configured.
pub fn spawn(state: AppState) -> Option<JoinHandle<()>> {
    let period = Duration::from_secs(state.config.sync_interval_secs?);
    info!("Scheduled resume sync every {}s", period.as_secs());

    Some(tokio::spawn(async move {
        let policy = RetryPolicy::from_config(&state.config);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            // Failures are already logged by the job; the next tick tries again.
            let _ = run_with_retries(&state.sync_job(), policy).await;
        }
    }))
}

/// Runs one scheduled sync, retrying retryable failures per `policy`.
pub async fn run_with_retries(
    job: &SyncJob<'_>,
    policy: RetryPolicy,
) -> Result<SyncResult, AppError> {
    let mut retry = 0;
    loop {
        match job.run(Trigger::Scheduled).await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && retry < policy.attempts => {
                let delay = policy.delay(retry);
                warn!(
                    "Scheduled sync attempt {} failed, retrying after {}ms...",
                    retry + 1,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
