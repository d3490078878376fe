//! Retrying gateway in front of an [`LlmProvider`].
//!
//! Transient failures (rate limiting, service unavailability) get a
//! bounded number of retries with exponential backoff. Timeouts and
//! everything else fail immediately.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::config::RetryPolicy;
use crate::providers::{LlmProvider, ProviderError};

/// Terminal gateway failures, after retries are exhausted.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("rate limit exceeded after {0} attempts")]
    RateLimitExceeded(u32),

    #[error("service unavailable after {0} attempts")]
    ServiceUnavailable(u32),

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    RequestFailed(String),
}

/// Per-session request counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct GatewayStats {
    pub requests: u64,
    pub retries: u64,
}

/// Backoff before retry `attempt` (0-based): `base * 2^attempt`.
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    base * 2u32.saturating_pow(attempt)
}

/// Wraps a provider with retry logic and usage accounting.
pub struct Gateway {
    provider: Arc<dyn LlmProvider>,
    policy: RetryPolicy,
    stats: Mutex<GatewayStats>,
}

impl Gateway {
    pub fn new(provider: Arc<dyn LlmProvider>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            policy,
            stats: Mutex::new(GatewayStats::default()),
        }
    }

    /// Snapshot of request counters.
    pub fn stats(&self) -> GatewayStats {
        *self.stats.lock()
    }

    /// Send a prompt, retrying transient failures.
    ///
    /// With `max_retries = N` the provider is called at most `N + 1`
    /// times. Rate limiting backs off from `rate_limit_base`, service
    /// unavailability from `unavailable_base`, both doubling per
    /// attempt.
    pub async fn send(&self, prompt: &str) -> Result<String, GatewayError> {
        let mut attempt: u32 = 0;
        loop {
            self.stats.lock().requests += 1;

            let err = match self.provider.complete(prompt).await {
                Ok(reply) => return Ok(reply),
                Err(err) => err,
            };

            let base = match &err {
                ProviderError::RateLimited => self.policy.rate_limit_base,
                ProviderError::Unavailable => self.policy.unavailable_base,
                ProviderError::Timeout => return Err(GatewayError::Timeout),
                other => return Err(GatewayError::RequestFailed(other.to_string())),
            };

            if attempt >= self.policy.max_retries {
                let attempts = attempt + 1;
                return Err(match err {
                    ProviderError::RateLimited => GatewayError::RateLimitExceeded(attempts),
                    _ => GatewayError::ServiceUnavailable(attempts),
                });
            }

            let delay = backoff_delay(attempt, base);
            warn!(
                provider = self.provider.name(),
                attempt = attempt + 1,
                max_retries = self.policy.max_retries,
                delay_secs = delay.as_secs_f64(),
                error = %err,
                "transient provider failure, backing off"
            );
            self.stats.lock().retries += 1;
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("provider", &self.provider.name())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    /// Provider that fails a fixed number of times before succeeding.
    struct FlakyProvider {
        calls: AtomicU32,
        failures: u32,
        error: fn() -> ProviderError,
    }

    impl FlakyProvider {
        fn new(failures: u32, error: fn() -> ProviderError) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures,
                error,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for FlakyProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err((self.error)())
            } else {
                Ok("ok".to_string())
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::default()
    }

    #[test]
    fn test_backoff_doubles() {
        let base = Duration::from_secs(2);
        assert_eq!(backoff_delay(0, base), Duration::from_secs(2));
        assert_eq!(backoff_delay(1, base), Duration::from_secs(4));
        assert_eq!(backoff_delay(2, base), Duration::from_secs(8));

        let base = Duration::from_secs(3);
        assert_eq!(backoff_delay(0, base), Duration::from_secs(3));
        assert_eq!(backoff_delay(2, base), Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_within_retry_budget() {
        let provider = Arc::new(FlakyProvider::new(2, || ProviderError::RateLimited));
        let gateway = Gateway::new(provider.clone(), policy());

        let reply = gateway.send("hello").await.unwrap();
        assert_eq!(reply, "ok");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);

        let stats = gateway.stats();
        assert_eq!(stats.requests, 3);
        assert_eq!(stats.retries, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_exhausts_after_four_tries() {
        let provider = Arc::new(FlakyProvider::new(u32::MAX, || ProviderError::RateLimited));
        let gateway = Gateway::new(provider.clone(), policy());

        let start = Instant::now();
        let err = gateway.send("hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::RateLimitExceeded(4)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
        // 2s + 4s + 8s of backoff before the final attempt
        assert_eq!(start.elapsed(), Duration::from_secs(14));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_uses_longer_base() {
        let provider = Arc::new(FlakyProvider::new(u32::MAX, || ProviderError::Unavailable));
        let gateway = Gateway::new(provider.clone(), policy());

        let start = Instant::now();
        let err = gateway.send("hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::ServiceUnavailable(4)));
        // 3s + 6s + 12s
        assert_eq!(start.elapsed(), Duration::from_secs(21));
    }

    #[tokio::test]
    async fn test_timeout_is_not_retried() {
        let provider = Arc::new(FlakyProvider::new(u32::MAX, || ProviderError::Timeout));
        let gateway = Gateway::new(provider.clone(), policy());

        let err = gateway.send("hello").await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_errors_fail_fast() {
        let provider = Arc::new(FlakyProvider::new(u32::MAX, || {
            ProviderError::Http("connection refused".to_string())
        }));
        let gateway = Gateway::new(provider, policy());

        let err = gateway.send("hello").await.unwrap_err();
        match err {
            GatewayError::RequestFailed(msg) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
