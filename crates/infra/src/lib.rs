//! # Enverify Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Configuration loading from environment and files
//! - A local AES-256-GCM key manager
//! - Environment and in-memory secret stores
//! - An in-memory lookup cache
//! - Tracing initialisation and the audit metric
//! - The `Database` facade that checks connectivity and registers hooks
//!
//! ## Architecture
//! - Implements traits defined in `enverify-core`
//! - Contains all "impure" code (environment, files, metrics registries)

pub mod cache;
pub mod config;
pub mod database;
pub mod errors;
pub mod keys;
pub mod observability;
pub mod secrets;

// Re-export commonly used items
pub use cache::InMemoryCacher;
pub use database::{
    Collaborators, ConnectivityProbe, Database, HookRegistry, KeyManagerProbe, SecretStoreProbe,
};
pub use errors::{ConnectivityError, StartupError};
pub use keys::LocalKeyManager;
pub use observability::init_tracing;
pub use secrets::{EnvSecretStore, InMemorySecretStore};
