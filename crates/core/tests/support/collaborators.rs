use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use enverify_common::error::CommonError;
use enverify_core::{Cacher, KeyManager, SecretStore};
use enverify_domain::SecretClass;

/// Reversible fake key manager.
///
/// Ciphertext is `key_id || 0x00 || plaintext ^ 0x5a`, so decrypting under
/// a different key id fails the way a real key manager would.
#[derive(Default)]
pub struct MockKeyManager {
    encrypt_calls: AtomicUsize,
    decrypt_calls: AtomicUsize,
    fail_encrypt: AtomicBool,
    fail_decrypt: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl MockKeyManager {
    pub fn encrypt_calls(&self) -> usize {
        self.encrypt_calls.load(Ordering::SeqCst)
    }

    pub fn decrypt_calls(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }

    pub fn fail_encrypt(&self, fail: bool) {
        self.fail_encrypt.store(fail, Ordering::SeqCst);
    }

    pub fn fail_decrypt(&self, fail: bool) {
        self.fail_decrypt.store(fail, Ordering::SeqCst);
    }

    /// Delay every call by `delay` before answering.
    pub fn stall(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    async fn maybe_stall(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn mask(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|b| b ^ 0x5a).collect()
}

#[async_trait]
impl KeyManager for MockKeyManager {
    async fn encrypt(
        &self,
        key_id: &str,
        plaintext: &[u8],
        _associated_data: &[u8],
    ) -> Result<Vec<u8>, CommonError> {
        self.encrypt_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_stall().await;
        if self.fail_encrypt.load(Ordering::SeqCst) {
            return Err(CommonError::backend("kms", "key disabled", false));
        }
        let mut out = key_id.as_bytes().to_vec();
        out.push(0);
        out.extend(mask(plaintext));
        Ok(out)
    }

    async fn decrypt(
        &self,
        key_id: &str,
        ciphertext: &[u8],
        _associated_data: &[u8],
    ) -> Result<Vec<u8>, CommonError> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_stall().await;
        if self.fail_decrypt.load(Ordering::SeqCst) {
            return Err(CommonError::backend("kms", "key disabled", false));
        }
        let split = ciphertext
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| CommonError::crypto("decrypt", "malformed ciphertext"))?;
        if &ciphertext[..split] != key_id.as_bytes() {
            return Err(CommonError::crypto("decrypt", "wrong key"));
        }
        Ok(mask(&ciphertext[split + 1..]))
    }
}

/// Cacher that records deletions and can be told to fail.
#[derive(Default)]
pub struct RecordingCacher {
    deleted: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl RecordingCacher {
    pub fn deleted(&self) -> Vec<(String, String)> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Cacher for RecordingCacher {
    async fn delete(&self, namespace: &str, key: &str) -> Result<(), CommonError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CommonError::backend("redis", "connection reset", true));
        }
        self.deleted.lock().unwrap().push((namespace.to_string(), key.to_string()));
        Ok(())
    }
}

/// Secret store whose key lists can be rotated during a test.
#[derive(Default)]
pub struct RotatingSecretStore {
    keys: Mutex<HashMap<SecretClass, Vec<Vec<u8>>>>,
    fetches: AtomicUsize,
}

impl RotatingSecretStore {
    pub fn with_key(self, class: SecretClass, key: &[u8]) -> Self {
        self.rotate(class, key);
        self
    }

    /// Prepend `key` as the new primary; existing keys become retired.
    pub fn rotate(&self, class: SecretClass, key: &[u8]) {
        self.keys.lock().unwrap().entry(class).or_default().insert(0, key.to_vec());
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for RotatingSecretStore {
    async fn fetch_secret(&self, class: SecretClass) -> Result<Vec<Vec<u8>>, CommonError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.keys.lock().unwrap().get(&class).cloned().unwrap_or_default())
    }
}
