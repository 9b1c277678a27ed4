use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::error::{Error, Result};
use crate::llm::provider::{LLMProvider, ResponseMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Linear backoff: the wait after the n-th failed attempt is n × base.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// The wait after the n-th failed attempt when the server asked for
    /// `retry_after`. A server hint may lengthen the backoff, but never past
    /// `base × max_attempts`.
    pub fn delay_with_hint(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.delay_after(attempt);
        let ceiling = (self.base_delay * self.max_attempts).max(backoff);
        match retry_after {
            Some(hint) => hint.clamp(backoff, ceiling),
            None => backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(30))
    }
}

/// Retries every failed call of the wrapped provider, rate limits included.
pub struct Retrying<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: LLMProvider> Retrying<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<P: LLMProvider> LLMProvider for Retrying<P> {
    async fn generate(&self, prompt: &str, mode: ResponseMode) -> Result<String> {
        let mut attempt = 1;

        loop {
            match self.inner.generate(prompt, mode).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.policy.max_attempts => {
                    let delay = self
                        .policy
                        .delay_with_hint(attempt, e.retry_after().map(Duration::from_secs));
                    tracing::warn!(
                        "{} call failed (attempt {}/{}), retrying in {:?}: {}",
                        self.inner.name(),
                        attempt,
                        self.policy.max_attempts,
                        delay,
                        e
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "{} call failed after {} attempt(s): {}",
                        self.inner.name(),
                        attempt,
                        e
                    );
                    return Err(Error::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        failures: u32,
        retry_after: u64,
        calls: AtomicU32,
    }

    #[async_trait]
    impl LLMProvider for Flaky {
        async fn generate(&self, _prompt: &str, _mode: ResponseMode) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(Error::RateLimited(self.retry_after))
            } else {
                Ok("ok".to_string())
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn flaky(failures: u32) -> Retrying<Flaky> {
        Retrying::new(
            Flaky {
                failures,
                retry_after: 0,
                calls: AtomicU32::new(0),
            },
            RetryPolicy::new(3, Duration::ZERO),
        )
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(30));
        assert_eq!(policy.delay_after(2), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let provider = flaky(2);
        let text = provider.generate("p", ResponseMode::Text).await.unwrap();
        assert_eq!(text, "ok");
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let provider = flaky(u32::MAX);
        let err = provider.generate("p", ResponseMode::Json).await.unwrap_err();
        assert!(matches!(err, Error::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_retry_after_hint_is_bounded() {
        let policy = RetryPolicy::default();
        let day = Some(Duration::from_secs(86_400));

        assert_eq!(policy.delay_with_hint(1, None), Duration::from_secs(30));
        assert_eq!(
            policy.delay_with_hint(1, Some(Duration::from_secs(45))),
            Duration::from_secs(45)
        );
        // Shorter hints never cut the backoff
        assert_eq!(
            policy.delay_with_hint(2, Some(Duration::from_secs(5))),
            Duration::from_secs(60)
        );
        assert_eq!(policy.delay_with_hint(1, day), Duration::from_secs(90));
        assert_eq!(policy.delay_with_hint(2, day), Duration::from_secs(90));
    }

    #[tokio::test]
    async fn test_huge_retry_after_does_not_stall() {
        let provider = Retrying::new(
            Flaky {
                failures: 1,
                retry_after: 86_400,
                calls: AtomicU32::new(0),
            },
            RetryPolicy::new(3, Duration::ZERO),
        );

        let text = tokio::time::timeout(
            Duration::from_secs(5),
            provider.generate("p", ResponseMode::Text),
        )
        .await
        .expect("retry waited on the server hint")
        .unwrap();
        assert_eq!(text, "ok");
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);
    }
}
