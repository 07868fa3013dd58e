//! Modular common utilities shared across Enverify crates.
//!
//! Nothing in this crate knows about tables, columns or secret classes; it
//! only provides the generic building blocks the field-encryption layer is
//! assembled from.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors and keyed hashing
//! - `runtime`: async retry, symmetric encryption, zeroizing key material

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod crypto;
#[cfg(feature = "foundation")]
pub mod error;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;
#[cfg(feature = "runtime")]
pub mod security;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use crypto::encryption::EncryptionService;
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification};
#[cfg(feature = "runtime")]
pub use resilience::{with_retries, RetryConfig, RetryConfigBuilder, RetryError, RetryResult};
#[cfg(feature = "runtime")]
pub use security::SecretBytes;
