//! Port interface for the external key manager
//!
//! The key manager owns the key material; this layer only ever sees key
//! identifiers and opaque ciphertext.

use std::sync::Arc;

use async_trait::async_trait;
use enverify_common::error::CommonError;

/// Encrypt/decrypt capability keyed by an identifier.
///
/// Implementations must tolerate concurrent calls from many records in
/// flight.
#[async_trait]
pub trait KeyManager: Send + Sync {
    async fn encrypt(
        &self,
        key_id: &str,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CommonError>;

    async fn decrypt(
        &self,
        key_id: &str,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CommonError>;
}

#[async_trait]
impl<T> KeyManager for Arc<T>
where
    T: KeyManager + ?Sized,
{
    async fn encrypt(
        &self,
        key_id: &str,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CommonError> {
        (**self).encrypt(key_id, plaintext, associated_data).await
    }

    async fn decrypt(
        &self,
        key_id: &str,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CommonError> {
        (**self).decrypt(key_id, ciphertext, associated_data).await
    }
}
