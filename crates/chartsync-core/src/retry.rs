use std::future::Future;
use std::time::Duration;

use chartsync_config::RequestConfig;
use chartsync_sources::{SourceError, WriteStatus};
use tracing::{error, warn};

/// Bounded retries with exponential backoff for idempotent remote writes.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Seconds; attempt `i` sleeps `backoff_base^i` before the next try.
    pub backoff_base: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff_base: 2,
        }
    }
}

impl From<&RequestConfig> for RetryPolicy {
    fn from(request: &RequestConfig) -> Self {
        Self {
            max_attempts: request.max_retries,
            backoff_base: request.backoff_factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    Completed(WriteStatus),
    /// Every attempt failed. The write did not happen; callers treat this
    /// as a per-list failure, never as a reason to abort the run.
    Exhausted,
}

impl RetryOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, RetryOutcome::Completed(_))
    }
}

/// Run `op` until it reports a terminal status or the attempt budget is
/// spent. Created and NoOp are terminal; a rejection or transport error
/// backs off and retries. Never panics and never propagates an error.
pub async fn execute<F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> RetryOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<WriteStatus, SourceError>>,
{
    for attempt in 0..policy.max_attempts {
        match op().await {
            Ok(status @ (WriteStatus::Created | WriteStatus::NoOp)) => {
                return RetryOutcome::Completed(status);
            }
            Ok(WriteStatus::Rejected(status)) => {
                warn!(
                    label,
                    attempt = attempt + 1,
                    status,
                    "Attempt rejected, retrying"
                );
            }
            Err(e) => {
                warn!(
                    label,
                    attempt = attempt + 1,
                    error = %e,
                    "Attempt failed, retrying"
                );
            }
        }
        tokio::time::sleep(Duration::from_secs(policy.backoff_base.pow(attempt))).await;
    }

    error!(label, attempts = policy.max_attempts, "All attempts failed");
    RetryOutcome::Exhausted
}
