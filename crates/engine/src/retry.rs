//! Retry with linear back-off for external API calls.
//!
//! [`with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 429, 5xx). The wait before the n-th
//! retry is `base_delay * n`, except that an error carrying an explicit
//! `Retry-After` hint (HTTP 429) overrides the computed delay. Non-transient
//! errors are returned immediately without any retry.

use std::future::Future;
use std::time::Duration;

/// Classifies errors for the retry loop.
pub trait RetriableError {
    /// True for errors worth retrying after a back-off delay.
    fn is_retriable(&self) -> bool;

    /// Server-mandated wait (HTTP 429 `Retry-After`), if any.
    ///
    /// When present it replaces the computed linear delay, so the loop
    /// never re-attempts before the server asked it to.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Retry policy: attempt count and base delay for linear back-off.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Base delay; the wait before retry `n` is `base_delay * n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// A policy that disables retries (single attempt).
    #[must_use]
    pub const fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    /// Three attempts with a one-second base delay, the workflow default.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Runs `operation` with up to `policy.max_attempts` attempts on transient errors.
///
/// | Attempt failed | Sleep before next attempt        |
/// |----------------|----------------------------------|
/// | 1              | `base_delay * 1` (or Retry-After) |
/// | 2              | `base_delay * 2` (or Retry-After) |
///
/// Non-retriable errors are returned immediately.
pub async fn with_backoff<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    E: RetriableError + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retriable() || attempt >= max_attempts {
                    return Err(err);
                }
                let delay = err
                    .retry_after()
                    .unwrap_or_else(|| policy.base_delay.saturating_mul(attempt));
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient error - retrying after back-off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("transient")]
        Transient,
        #[error("fatal")]
        Fatal,
        #[error("rate limited")]
        RateLimited,
    }

    impl RetriableError for TestError {
        fn is_retriable(&self) -> bool {
            !matches!(self, Self::Fatal)
        }

        fn retry_after(&self) -> Option<Duration> {
            matches!(self, Self::RateLimited).then(|| Duration::from_millis(5))
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = with_backoff(RetryPolicy::new(3, Duration::ZERO), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, TestError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = with_backoff(RetryPolicy::new(3, Duration::ZERO), || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) + 1 < 3 {
                    Err(TestError::Transient)
                } else {
                    Ok(99u32)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_fatal_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = with_backoff(RetryPolicy::new(3, Duration::ZERO), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(TestError::Fatal)
            }
        })
        .await;
        assert!(matches!(result, Err(TestError::Fatal)));
        assert_eq!(calls.load(Ordering::SeqCst), 1, "fatal must not be retried");
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = with_backoff(RetryPolicy::new(3, Duration::ZERO), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(TestError::Transient)
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn honors_retry_after_hint() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let started = std::time::Instant::now();
        let result = with_backoff(RetryPolicy::new(2, Duration::ZERO), || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(TestError::RateLimited)
                } else {
                    Ok(7u32)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert!(
            started.elapsed() >= Duration::from_millis(5),
            "must wait at least the Retry-After hint"
        );
    }
}
