//! Shared test helpers for `enverify-core` integration tests.
//!
//! In-memory collaborators record every call so tests can assert on how
//! often the key manager, secret store and cache were reached.

#![allow(dead_code)]

pub mod collaborators;
pub mod records;

use std::sync::Arc;
use std::time::Duration;

use enverify_core::{
    CacheInvalidator, FieldEncryptor, FieldRegistry, HmacSigner, RecordPipeline, SecretResolver,
};
use enverify_domain::{Config, SecretClass};

pub use collaborators::{MockKeyManager, RecordingCacher, RotatingSecretStore};

pub const KEY_ID: &str = "k1";

/// Pipeline wired to mocks using the default column layout.
pub struct Harness {
    pub key_manager: Arc<MockKeyManager>,
    pub cacher: Arc<RecordingCacher>,
    pub store: Arc<RotatingSecretStore>,
    pub resolver: Arc<SecretResolver>,
    pub pipeline: RecordPipeline,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(Config::with_encryption_key_id(KEY_ID))
    }

    pub fn with_config(config: Config) -> Self {
        let key_manager = Arc::new(MockKeyManager::default());
        let cacher = Arc::new(RecordingCacher::default());
        let store = Arc::new(
            RotatingSecretStore::default()
                .with_key(SecretClass::VerificationCodeDatabaseHmac, b"code-key-v1"),
        );
        let resolver = Arc::new(SecretResolver::new(
            store.clone(),
            Duration::from_secs(300),
            Duration::from_secs(5),
        ));

        let registry = Arc::new(FieldRegistry::from_config(&config).unwrap());
        let encryptor = FieldEncryptor::new(
            key_manager.clone(),
            config.keys.encryption_key_id.clone(),
            config.keys.crypto_timeout(),
        );
        let pipeline = RecordPipeline::new(
            registry,
            encryptor,
            HmacSigner::new(resolver.clone()),
            CacheInvalidator::new(cacher.clone()),
        );

        Self { key_manager, cacher, store, resolver, pipeline }
    }
}
