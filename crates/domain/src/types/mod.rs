//! Domain types and models

pub mod fields;
pub mod secrets;

pub use fields::{CacheInvalidationRule, CacheKey, EncryptedFieldSpec, HmacFieldSpec};
pub use secrets::{ResolvedSecretSet, SecretClass};
