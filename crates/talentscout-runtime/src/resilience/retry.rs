//! Retry with exponential backoff for transient provider errors.

use backon::{ExponentialBuilder, Retryable};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::providers::ProviderError;

/// Backoff settings. Only errors where [`ProviderError::is_retryable`] holds
/// are retried. A server hint (`retry-after`, model load estimate) stretches
/// the next delay, up to `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: usize,

    /// Delay before the first retry, doubled each time
    #[serde(with = "crate::config::duration_str")]
    pub min_delay: Duration,

    /// Upper bound on any single delay
    #[serde(with = "crate::config::duration_str")]
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries)
    }

    /// Run `operation`, retrying transient failures.
    pub async fn run<T, F, Fut>(&self, operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max_delay = self.max_delay;
        operation
            .retry(self.backoff())
            .sleep(tokio::time::sleep)
            .when(ProviderError::is_retryable)
            .adjust(move |err: &ProviderError, delay: Option<Duration>| {
                delay.map(|d| match err.retry_hint() {
                    Some(hint) => hint.max(d).min(max_delay),
                    None => d,
                })
            })
            .notify(|err: &ProviderError, delay: Duration| {
                tracing::debug!(error = %err, delay = ?delay, "Retrying model call");
            })
            .await
    }
}
