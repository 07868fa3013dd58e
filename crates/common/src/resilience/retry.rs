//! Bounded retry with a fixed delay
//!
//! Each failure is asked through [`ErrorClassification`] whether another
//! attempt can help; a non-retryable error stops the loop at once.
//! Exhausting every attempt returns the last error wrapped in
//! [`RetryError::AttemptsExhausted`].

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::error::ErrorClassification;

/// Default number of attempts used for start-up connectivity checks.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Default fixed delay between start-up connectivity attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Errors that can occur during retry operations
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// All retry attempts have been exhausted; carries the last failure
    #[error("All retry attempts exhausted after {attempts} tries: {source}")]
    AttemptsExhausted { attempts: u32, source: E },

    /// The operation failed with a non-retryable error
    #[error("Operation failed with non-retryable error: {source}")]
    NonRetryable { source: E },

    /// The retry configuration is invalid
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl<E> RetryError<E> {
    /// The underlying operation error, if the failure came from the operation.
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::AttemptsExhausted { source, .. } | Self::NonRetryable { source } => Some(source),
            Self::InvalidConfiguration { .. } => None,
        }
    }

    /// Number of attempts made before giving up (1 for non-retryable errors).
    pub fn attempts(&self) -> u32 {
        match self {
            Self::AttemptsExhausted { attempts, .. } => *attempts,
            Self::NonRetryable { .. } => 1,
            Self::InvalidConfiguration { .. } => 0,
        }
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Attempt budget for [`with_retries`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, delay: DEFAULT_RETRY_DELAY }
    }
}

impl RetryConfig {
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    /// # Errors
    /// `InvalidConfiguration` when `max_attempts` is zero.
    pub fn validate(&self) -> Result<(), RetryError<()>> {
        if self.max_attempts == 0 {
            return Err(RetryError::InvalidConfiguration {
                message: "max_attempts must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for RetryConfig with fluent API
#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    pub fn build(self) -> Result<RetryConfig, RetryError<()>> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Run `operation` under `config`, retrying only errors that classify
/// themselves as retryable.
///
/// Used for start-up connectivity (database, key manager, secret store).
/// Steady-state crypto calls must not go through here; they fail fast.
#[instrument(skip_all, fields(max_attempts = config.max_attempts))]
pub async fn with_retries<F, Fut, T, E>(config: RetryConfig, mut operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: ErrorClassification + fmt::Display,
{
    if let Err(RetryError::InvalidConfiguration { message }) = config.validate() {
        return Err(RetryError::InvalidConfiguration { message });
    }

    let started = Instant::now();
    let mut attempt: u32 = 1;

    loop {
        debug!(attempt, "Executing operation");

        let error = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        attempts = attempt,
                        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                        "Operation succeeded after retries"
                    );
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if !error.is_retryable() {
            debug!(error = %error, "Error is not retryable");
            return Err(RetryError::NonRetryable { source: error });
        }

        if attempt >= config.max_attempts {
            warn!(attempts = attempt, error = %error, "All retry attempts exhausted");
            return Err(RetryError::AttemptsExhausted { attempts: attempt, source: error });
        }

        warn!(attempt, error = %error, "Operation failed, retrying");
        tokio::time::sleep(config.delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::error::CommonError;

    /// Validates `RetryConfig::default` behavior for the start-up defaults
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms 30 attempts with a fixed one second delay.
    #[test]
    fn test_retry_config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 30);
        assert_eq!(config.delay, Duration::from_secs(1));
    }

    #[test]
    fn test_builder_rejects_zero_attempts() {
        let result = RetryConfig::builder().max_attempts(0).build();
        assert!(matches!(result, Err(RetryError::InvalidConfiguration { .. })));
    }

    /// Validates `with_retries` behavior for the eventual success scenario.
    ///
    /// Assertions:
    /// - Confirms the value from the third attempt is returned.
    /// - Confirms two delays of one second elapsed.
    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let started = tokio::time::Instant::now();

        let result: RetryResult<&str, CommonError> =
            with_retries(RetryConfig::builder().max_attempts(5).build().unwrap(), || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(CommonError::backend("db", "connection refused", true))
                    } else {
                        Ok("connected")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "connected");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_carries_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: RetryResult<(), CommonError> =
            with_retries(RetryConfig::builder().max_attempts(3).build().unwrap(), || {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    Err(CommonError::backend("db", format!("refused #{n}"), true))
                }
            })
            .await;

        match result {
            Err(RetryError::AttemptsExhausted { attempts, source }) => {
                assert_eq!(attempts, 3);
                assert!(source.to_string().contains("refused #2"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    /// Validates `with_retries` behavior for the non-retryable error
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms a non-retryable error aborts after a single attempt.
    #[tokio::test(start_paused = true)]
    async fn test_stops_on_non_retryable() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: RetryResult<(), CommonError> = with_retries(RetryConfig::default(), || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CommonError::crypto("decrypt", "tag mismatch"))
            }
        })
        .await;

        assert!(matches!(result, Err(RetryError::NonRetryable { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_is_rejected_before_running() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig { max_attempts: 0, delay: Duration::ZERO };

        let result: RetryResult<(), CommonError> = with_retries(config, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
        .await;

        assert_eq!(result.unwrap_err().attempts(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
