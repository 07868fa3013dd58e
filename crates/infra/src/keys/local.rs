//! Local AES-256-GCM key manager
//!
//! Holds one [`EncryptionService`] per key identifier. Intended for
//! development and test deployments where no external key management
//! service is available. Associated data is bound into the GCM tag.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use enverify_common::crypto::EncryptionService;
use enverify_common::error::CommonError;
use enverify_common::SecretBytes;
use enverify_core::KeyManager;
use enverify_domain::{EnverifyError, KeysConfig, Result};
use tracing::info;

#[derive(Default)]
pub struct LocalKeyManager {
    keys: HashMap<String, EncryptionService>,
}

impl LocalKeyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` under `key_id`, replacing any previous key.
    ///
    /// # Errors
    /// `Configuration` when the key is not 32 bytes.
    pub fn with_key(mut self, key_id: impl Into<String>, key: impl Into<SecretBytes>) -> Result<Self> {
        let key_id = key_id.into();
        let service = EncryptionService::new(key)
            .map_err(|e| EnverifyError::Configuration(format!("local key {key_id}: {e}")))?;
        info!(key_id = %key_id, fingerprint = %service.key_fingerprint(), "Registered local key");
        self.keys.insert(key_id, service);
        Ok(self)
    }

    /// Build from `keys.local_keys` (key id to base64 key).
    pub fn from_config(config: &KeysConfig) -> Result<Self> {
        config.local_keys.iter().try_fold(Self::new(), |manager, (key_id, encoded)| {
            let key = STANDARD.decode(encoded.trim()).map_err(|e| {
                EnverifyError::Configuration(format!("local key {key_id} is not valid base64: {e}"))
            })?;
            manager.with_key(key_id.as_str(), key)
        })
    }

    pub fn contains(&self, key_id: &str) -> bool {
        self.keys.contains_key(key_id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn service(&self, key_id: &str) -> std::result::Result<&EncryptionService, CommonError> {
        self.keys.get(key_id).ok_or_else(|| CommonError::not_found_with_id("encryption key", key_id))
    }
}

#[async_trait]
impl KeyManager for LocalKeyManager {
    async fn encrypt(
        &self,
        key_id: &str,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> std::result::Result<Vec<u8>, CommonError> {
        self.service(key_id)?.seal(plaintext, associated_data)
    }

    async fn decrypt(
        &self,
        key_id: &str,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> std::result::Result<Vec<u8>, CommonError> {
        self.service(key_id)?.open(ciphertext, associated_data)
    }
}

impl std::fmt::Debug for LocalKeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.keys.keys().collect();
        ids.sort();
        f.debug_struct("LocalKeyManager").field("key_ids", &ids).finish()
    }
}
