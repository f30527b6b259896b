//! Retry with exponential backoff for collaborator HTTP calls.
//!
//! Only errors the caller classifies as transient (rate limiting, server
//! errors) are retried. Anything else is returned immediately as
//! [`RetryError::Fatal`].

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// How often and how patiently to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each following one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }
}

/// Outcome of a failed retried operation.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E: std::error::Error + 'static> {
    /// Every attempt failed with a transient error
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },

    /// A non-retryable error ended the loop
    #[error(transparent)]
    Fatal(E),
}

impl<E: std::error::Error + 'static> RetryError<E> {
    /// The underlying error, whichever way the loop ended.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { last, .. } => last,
            RetryError::Fatal(e) => e,
        }
    }
}

/// Run `op` until it succeeds, fails fatally, or retries run out.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    is_retryable: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    E: std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if !is_retryable(&e) => return Err(RetryError::Fatal(e)),
            Err(e) if attempt >= policy.max_retries => {
                return Err(RetryError::Exhausted {
                    attempts: attempt + 1,
                    last: e,
                });
            }
            Err(e) => {
                let wait = policy.delay_for(attempt);
                warn!(error = %e, attempt, ?wait, "transient failure, retrying");
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("busy")]
        Busy,
        #[error("bad request")]
        Bad,
    }

    fn fast() -> RetryPolicy {
        RetryPolicy::new(2, Duration::from_millis(1))
    }

    fn busy(e: &TestError) -> bool {
        matches!(e, TestError::Busy)
    }

    #[test]
    fn delays_double() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(3));
        assert_eq!(policy.delay_for(1), Duration::from_secs(6));
        assert_eq!(policy.delay_for(2), Duration::from_secs(12));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(fast(), busy, || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(TestError::Busy)
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_when_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(fast(), busy, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TestError::Busy)
        })
        .await;
        match result {
            Err(RetryError::Exhausted { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fatal_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(fast(), busy, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TestError::Bad)
        })
        .await;
        assert!(matches!(result, Err(RetryError::Fatal(TestError::Bad))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn error_display() {
        let err: RetryError<TestError> = RetryError::Exhausted {
            attempts: 3,
            last: TestError::Busy,
        };
        assert_eq!(err.to_string(), "gave up after 3 attempts: busy");
        assert_eq!(RetryError::Fatal(TestError::Bad).to_string(), "bad request");
    }
}
