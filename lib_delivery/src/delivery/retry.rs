//! # Retry Policy
//!
//! Wraps one asynchronous source call with a bounded number of attempts and a
//! fixed pause between them. There is no jitter and no growth: the calls this
//! guards happen once per page load and are short-lived.
//!
//! Every attempt is a fresh invocation of the operation, so network calls are
//! not deduplicated across retries.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::error::{DeliveryError, DeliveryResult};

/// Bounded fixed-delay retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause between two attempts.
    pub delay: Duration,
    /// Optional budget for a single attempt. A timed-out attempt counts as failed.
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    /// Three attempts, one second apart, no per-attempt timeout.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            attempt_timeout: None,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy without a per-attempt timeout.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            attempt_timeout: None,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Adds a per-attempt timeout.
    pub fn with_attempt_timeout(mut self, budget: Duration) -> Self {
        self.attempt_timeout = Some(budget);
        self
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Runs `operation` until it succeeds or the policy's attempts are used up.
///
/// # Errors
/// Returns [`DeliveryError::SourceExhausted`] carrying the error of the last
/// attempt when no attempt succeeded.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> DeliveryResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DeliveryResult<T>>,
{
    let max_attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;

        let outcome = match policy.attempt_timeout {
            Some(budget) => match timeout(budget, operation()).await {
                Ok(result) => result,
                Err(_) => Err(DeliveryError::Timeout(budget)),
            },
            None => operation().await,
        };

        let err = match outcome {
            Ok(value) => {
                if attempt > 1 {
                    log::debug!("'{}' succeeded on attempt {}/{}", label, attempt, max_attempts);
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if attempt >= max_attempts {
            log::warn!("'{}' failed after {} attempt(s): {}", label, attempt, err);
            return Err(DeliveryError::SourceExhausted {
                source_name: label.to_string(),
                attempts: attempt,
                last: Box::new(err),
            });
        }

        log::warn!("'{}' attempt {}/{} failed: {}. Retrying in {:?}", label, attempt, max_attempts, err, policy.delay);
        sleep(policy.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn failing(counter: &Arc<AtomicU32>, succeed_on: u32) -> impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = DeliveryResult<u32>> + Send>> {
        let counter = Arc::clone(counter);
        move || {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n >= succeed_on {
                    Ok(n)
                } else {
                    Err(DeliveryError::provider("flaky", format!("attempt {n}")))
                }
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn returns_first_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));

        let value = with_retry(&policy, "flaky", failing(&calls, 2)).await.unwrap();

        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_carries_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(3, Duration::from_millis(500));

        let err = with_retry(&policy, "flaky", failing(&calls, 10)).await.unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            DeliveryError::SourceExhausted { source_name, attempts, last } => {
                assert_eq!(source_name, "flaky");
                assert_eq!(attempts, 3);
                assert!(last.to_string().contains("attempt 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_fixed_delay_between_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(4, Duration::from_secs(2));
        let started = tokio::time::Instant::now();

        let _ = with_retry(&policy, "flaky", failing(&calls, 100)).await;

        // Three pauses between four attempts, no growth.
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_calls_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(0, Duration::from_secs(1));

        assert!(with_retry(&policy, "flaky", failing(&calls, 5)).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_attempt_times_out_and_is_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(2, Duration::from_millis(10)).with_attempt_timeout(Duration::from_millis(100));
        let counter = Arc::clone(&calls);

        let value = with_retry(&policy, "slow", move || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n == 1 {
                    sleep(Duration::from_secs(5)).await;
                }
                Ok::<_, DeliveryError>(n)
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 2);
    }
}
