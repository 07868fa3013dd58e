//! # Enverify Core
//!
//! Field encryption and HMAC indexing logic - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Port interfaces for the key manager, secret store, cache and mutation
//!   observers
//! - The `Record` accessor trait persisted entities implement
//! - Services: secret resolution, HMAC signing, field encryption, cache
//!   invalidation and the record pipeline that sequences them
//!
//! ## Architecture Principles
//! - Only depends on `enverify-common` and `enverify-domain`
//! - No database, network or key storage code
//! - All external collaborators via traits

pub mod encryption;
pub mod invalidation;
pub mod pipeline;
pub mod record;
pub mod secrets;
pub mod signing;

// Re-export specific items to avoid ambiguity
pub use encryption::ports::KeyManager;
pub use encryption::FieldEncryptor;
pub use invalidation::ports::Cacher;
pub use invalidation::CacheInvalidator;
pub use pipeline::ports::MutationObserver;
pub use pipeline::{FieldRegistry, RecordPipeline};
pub use record::{CachePair, EncryptedField, Record};
pub use secrets::ports::SecretStore;
pub use secrets::SecretResolver;
pub use signing::HmacSigner;
