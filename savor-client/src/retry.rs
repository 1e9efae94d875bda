//! Fixed-delay retry for print submissions
//!
//! Attempts run strictly one after another so the relay never sees two
//! copies of the same job in flight. The wait between attempts is constant
//! and there is no wait after the last one.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{ClientConfig, ClientError, ClientResult};

/// Retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,
    /// Wait between two attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Zero attempts is raised to one
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.retry_attempts, config.retry_delay)
    }

    /// Run `op` until it succeeds or the attempts are used up
    ///
    /// `op` receives the 1-based attempt number. On exhaustion the last
    /// error's message is wrapped in [`ClientError::RetryExhausted`].
    pub async fn run<T, F, Fut>(&self, mut op: F) -> ClientResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let mut last_error: Option<ClientError> = None;

        for attempt in 1..=self.attempts {
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        info!(attempt, "Print succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.attempts,
                        error = %e,
                        "Print attempt failed"
                    );
                    last_error = Some(e);

                    if attempt < self.attempts {
                        debug!(delay_ms = self.delay.as_millis() as u64, "Waiting before retry");
                        tokio::time::sleep(self.delay).await;
                    }
                }
            }
        }

        let message = last_error
            .map(|e| e.message())
            .unwrap_or_else(|| "unknown error".to_string());
        Err(ClientError::RetryExhausted {
            attempts: self.attempts,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    const DELAY: Duration = Duration::from_millis(2000);

    #[tokio::test(start_paused = true)]
    async fn test_first_success_has_no_delay() {
        let policy = RetryPolicy::new(3, DELAY);
        let start = Instant::now();
        let result = policy.run(|_| async { Ok::<_, ClientError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_attempt_waits_twice() {
        let policy = RetryPolicy::new(3, DELAY);
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(ClientError::Network("refused".into()))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), DELAY * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_skips_final_delay() {
        let policy = RetryPolicy::new(4, DELAY);
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let err = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Err::<(), _>(ClientError::server(Some(500), format!("boom {attempt}"))) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(start.elapsed(), DELAY * 3);
        match err {
            ClientError::RetryExhausted { attempts, message } => {
                assert_eq!(attempts, 4);
                assert_eq!(message, "boom 4");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_never_sleeps() {
        let policy = RetryPolicy::new(1, DELAY);
        let start = Instant::now();
        let err = policy
            .run(|_| async { Err::<(), _>(ClientError::Network("down".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::RetryExhausted { attempts: 1, .. }));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_zero_attempts_raised_to_one() {
        assert_eq!(RetryPolicy::new(0, DELAY).attempts, 1);
    }

    #[test]
    fn test_from_config_uses_client_defaults() {
        let policy = RetryPolicy::from_config(&ClientConfig::new("key"));
        assert_eq!(policy.attempts, crate::config::DEFAULT_RETRY_ATTEMPTS);
        assert_eq!(policy.delay, crate::config::DEFAULT_RETRY_DELAY);

        let config = ClientConfig::new("key").with_retry_attempts(0);
        assert_eq!(RetryPolicy::from_config(&config).attempts, 1);
    }
}
