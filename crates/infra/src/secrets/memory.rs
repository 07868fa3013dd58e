//! In-memory secret store with rotation support

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use enverify_common::error::CommonError;
use enverify_core::SecretStore;
use enverify_domain::{SecretClass, SecretsConfig};
use tracing::info;

use super::decode_keys;

/// Keys held in process memory, newest first per class.
#[derive(Default)]
pub struct InMemorySecretStore {
    keys: RwLock<HashMap<SecretClass, Vec<Vec<u8>>>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from `secrets.inline`.
    pub fn from_config(config: &SecretsConfig) -> enverify_domain::Result<Self> {
        let store = Self::new();
        for (class, encoded) in config.inline_by_class()? {
            let keys = decode_keys(class.as_str(), encoded.iter().map(String::as_str))
                .map_err(|e| enverify_domain::EnverifyError::Configuration(format!("secrets.inline: {e}")))?;
            store.set(class, keys);
        }
        Ok(store)
    }

    /// Replace every key of `class`.
    pub fn set(&self, class: SecretClass, keys: Vec<Vec<u8>>) {
        self.keys.write().unwrap_or_else(PoisonError::into_inner).insert(class, keys);
    }

    /// Make `key` the new primary of `class`; previous keys become retired.
    pub fn rotate(&self, class: SecretClass, key: impl Into<Vec<u8>>) {
        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        let entry = keys.entry(class).or_default();
        entry.insert(0, key.into());
        info!(secret_class = %class, retired_keys = entry.len() - 1, "Rotated secret");
    }

    pub fn key_count(&self, class: SecretClass) -> usize {
        self.keys.read().unwrap_or_else(PoisonError::into_inner).get(&class).map_or(0, Vec::len)
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn fetch_secret(&self, class: SecretClass) -> Result<Vec<Vec<u8>>, CommonError> {
        Ok(self
            .keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&class)
            .cloned()
            .unwrap_or_default())
    }
}

impl std::fmt::Debug for InMemorySecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let classes = self.keys.read().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("InMemorySecretStore").field("classes", &classes).finish()
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    use super::*;

    #[tokio::test]
    async fn rotate_prepends_primary() {
        let store = InMemorySecretStore::new();
        store.rotate(SecretClass::CookieKeys, b"old".to_vec());
        store.rotate(SecretClass::CookieKeys, b"new".to_vec());

        let keys = store.fetch_secret(SecretClass::CookieKeys).await.unwrap();
        assert_eq!(keys, vec![b"new".to_vec(), b"old".to_vec()]);
    }

    #[tokio::test]
    async fn unknown_class_is_empty() {
        let keys = InMemorySecretStore::new().fetch_secret(SecretClass::ApiKeySignatureHmac).await.unwrap();
        assert!(keys.is_empty());
    }

    #[test]
    fn from_config_decodes_inline_keys() {
        let mut config = SecretsConfig::default();
        config.inline.insert(
            "verification_code_database_hmac".into(),
            vec![STANDARD.encode(b"k2"), STANDARD.encode(b"k1")],
        );

        let store = InMemorySecretStore::from_config(&config).unwrap();
        assert_eq!(store.key_count(SecretClass::VerificationCodeDatabaseHmac), 2);
    }

    #[test]
    fn from_config_rejects_unknown_class() {
        let mut config = SecretsConfig::default();
        config.inline.insert("session_keys".into(), vec![]);
        assert!(InMemorySecretStore::from_config(&config).is_err());
    }
}
