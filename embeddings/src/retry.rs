//! Bounded retry with fixed backoff.
//!
//! The attempt loop is separated from the I/O call itself: callers hand in
//! a factory closure that performs one attempt, and the loop invokes it
//! once per attempt. Connection setup belongs inside the closure, so every
//! attempt runs on a freshly constructed client.

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use crate::error::{EmbeddingError, Result};

/// Retry policy for remote embedding calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,

    /// Sleep between consecutive attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Run `attempt` up to `max_attempts` times, sleeping `backoff` between
    /// failures.
    ///
    /// Each invocation of the closure is a full attempt; the 1-based attempt
    /// number is passed in for logging. Exhaustion yields
    /// [`EmbeddingError::RemoteService`] carrying the attempt count and the
    /// last underlying error.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_error = String::new();

        for n in 1..=self.max_attempts {
            match attempt(n).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("Attempt {n} failed: {e}");
                    last_error = e.to_string();
                    if n < self.max_attempts {
                        tokio::time::sleep(self.backoff).await;
                    }
                }
            }
        }

        error!("All {} attempts failed", self.max_attempts);
        Err(EmbeddingError::RemoteService {
            attempts: self.max_attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_first_attempt_success_skips_retry() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            })
            .await
            .unwrap();

        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_single_failure() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result = policy
            .run(|_| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 1 {
                        Err(EmbeddingError::ApiRequest("boom".to_string()))
                    } else {
                        Ok(vec![1.0f32, 2.0])
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, vec![1.0, 2.0]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_carries_attempt_count_and_cause() {
        let policy = RetryPolicy::default();

        let err = policy
            .run(|_| async { Err::<(), _>(EmbeddingError::ApiRequest("down".to_string())) })
            .await
            .unwrap_err();

        match err {
            EmbeddingError::RemoteService {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 2);
                assert!(last_error.contains("down"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_between_attempts() {
        let policy = RetryPolicy::default();
        let start = tokio::time::Instant::now();

        let _ = policy
            .run(|_| async { Err::<(), _>(EmbeddingError::ApiRequest("down".to_string())) })
            .await;

        // One sleep between the two attempts, none after the last.
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }
}
