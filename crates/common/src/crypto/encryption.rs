//! AES-256-GCM sealing primitive.
//!
//! [`EncryptionService`] seals a plaintext under a single 32-byte key with
//! caller-supplied associated data. The sealed form is the 12-byte random
//! nonce followed by the ciphertext and tag; the associated data is bound
//! into the tag but never stored.
//!
//! ```rust,ignore
//! use enverify_common::crypto::encryption::EncryptionService;
//!
//! let service = EncryptionService::new(EncryptionService::generate_key())?;
//! let sealed = service.seal(b"secret123", b"sms_configs")?;
//! assert_eq!(service.open(&sealed, b"sms_configs")?, b"secret123");
//! # Ok::<(), enverify_common::error::CommonError>(())
//! ```

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CommonError, CommonResult};
use crate::security::SecretBytes;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM encryption service bound to one key.
pub struct EncryptionService {
    key: SecretBytes,
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService").field("key", &"[REDACTED]").finish()
    }
}

impl EncryptionService {
    /// Create a new encryption service from a raw 32-byte key.
    pub fn new(key: impl Into<SecretBytes>) -> CommonResult<Self> {
        let key = key.into();
        if key.len() != KEY_LEN {
            return Err(CommonError::crypto(
                "init",
                format!("encryption key must be exactly {KEY_LEN} bytes, got {}", key.len()),
            ));
        }

        let cipher = Aes256Gcm::new_from_slice(key.expose())
            .map_err(|e| CommonError::crypto("init", format!("failed to create cipher: {e}")))?;

        Ok(Self { key, cipher })
    }

    /// Generate a random 32-byte symmetric key.
    pub fn generate_key() -> Vec<u8> {
        let mut key = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        key
    }

    /// Seal `plaintext`, binding `aad` into the authentication tag.
    pub fn seal(&self, plaintext: &[u8], aad: &[u8]) -> CommonResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), Payload { msg: plaintext, aad })
            .map_err(|e| CommonError::crypto("encrypt", e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Open a payload produced by [`seal`](Self::seal) with the same `aad`.
    pub fn open(&self, sealed: &[u8], aad: &[u8]) -> CommonResult<Vec<u8>> {
        if sealed.len() <= NONCE_LEN {
            return Err(CommonError::crypto("decrypt", "sealed payload is too short"));
        }
        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);

        self.cipher
            .decrypt(Nonce::from_slice(nonce_bytes), Payload { msg: ciphertext, aad })
            .map_err(|_| CommonError::crypto("decrypt", "authentication failed"))
    }

    /// Short, non-reversible fingerprint of the key for log correlation.
    pub fn key_fingerprint(&self) -> String {
        crate::crypto::hmac::fingerprint(self.key.expose())
    }
}
