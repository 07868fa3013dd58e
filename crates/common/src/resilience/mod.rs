//! Resilience patterns for transient failures
//!
//! Only bounded retry lives here. It is meant for establishing connectivity
//! at process start; per-record cryptographic operations fail fast and never
//! pass through it.

pub mod retry;

pub use retry::{
    with_retries, RetryConfig, RetryConfigBuilder, RetryError, RetryResult, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RETRY_DELAY,
};
