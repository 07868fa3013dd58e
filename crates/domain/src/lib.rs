//! # Enverify Domain
//!
//! Data types for the field-encryption and HMAC-indexing layer.
//!
//! This crate contains:
//! - Secret classes and resolved key sets
//! - Static field descriptors (encrypted columns, HMAC columns, cache
//!   invalidation rules)
//! - The `EnverifyError` taxonomy and `Result` alias
//! - Configuration structures and their validation
//!
//! ## Architecture
//! - No dependencies on other Enverify crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::{Config, KeysConfig, SecretsConfig, StartupConfig};
pub use errors::{EnverifyError, Result, USER_FACING_FAILURE};
pub use types::{
    CacheInvalidationRule, CacheKey, EncryptedFieldSpec, HmacFieldSpec, ResolvedSecretSet,
    SecretClass,
};
