//! Retry policy with linearly scaled backoff
//!
//! The transit services are independently deployed and may be mid-restart
//! or briefly unreachable; retrying idempotent reads converts such blips
//! into successful calls. Only one policy exists, parameterized by attempt
//! count, so reads and writes differ solely in how many attempts they get.

use std::future::Future;
use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;

use crate::api::error::ApiError;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Single-attempt config for non-idempotent operations.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
        }
    }
}

/// Executes request attempts under a [`RetryConfig`].
///
/// A failure is retried only when it is classified retryable (transport
/// errors, per-attempt timeouts, HTTP 5xx) and attempts remain. The delay
/// before retry `n` is `base_delay * n`, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Policy that issues exactly one attempt. Used for every write so a
    /// transient failure can never cause a duplicate side effect.
    pub fn no_retry() -> Self {
        Self::new(RetryConfig::no_retry())
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    /// Execute a request-producing closure with retry logic.
    ///
    /// The closure is invoked fresh for each attempt so request state
    /// (including the bearer token) is rebuilt every time. Returns the
    /// first successful response, or the classified error: non-retryable
    /// failures surface immediately, exhausted retryable failures surface
    /// as [`ApiError::ServiceUnavailable`].
    pub async fn execute<F, Fut>(&self, operation: F) -> Result<reqwest::Response, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            debug!("Executing request (attempt {}/{})", attempt, max_attempts);

            let error = match operation().await {
                Ok(response) if response.status().is_success() => {
                    if attempt > 1 {
                        info!("Request succeeded after {} attempts", attempt);
                    }
                    return Ok(response);
                }
                Ok(response) => ApiError::from_response(response).await,
                Err(transport) => ApiError::from_transport(&transport),
            };

            if !error.is_retryable() {
                warn!("Request failed permanently on attempt {}: {}", attempt, error);
                return Err(error);
            }

            if attempt == max_attempts {
                warn!(
                    "Request failed on attempt {} with retries exhausted: {}",
                    attempt, error
                );
                // A single-attempt policy reports the original class so
                // write failures stay precise.
                if max_attempts == 1 {
                    return Err(error);
                }
                return Err(ApiError::ServiceUnavailable {
                    attempts: attempt,
                    message: error.to_string(),
                });
            }

            let delay = self.calculate_delay(attempt);
            warn!(
                "Request failed on attempt {} (retryable): {}, retrying in {:?}",
                attempt, error, delay
            );
            tokio::time::sleep(delay).await;
        }

        unreachable!("retry loop returns on every terminal attempt")
    }

    /// Delay before the retry that follows `attempt`, scaled linearly by
    /// attempt number and capped at `max_delay`.
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let mut delay = self
            .config
            .base_delay
            .saturating_mul(attempt)
            .min(self.config.max_delay);

        if self.config.jitter {
            let jitter_factor = rand::thread_rng().gen_range(0.5..=1.5);
            delay = Duration::from_millis((delay.as_millis() as f64 * jitter_factor) as u64);
        }

        delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
