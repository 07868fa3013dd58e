//! Field encryption through the key manager
//!
//! Ciphertext is stored as unpadded standard base64; reads accept either
//! alphabet with or without padding. When a column has a
//! plaintext/ciphertext memo pair and the value is unchanged since the last
//! transform, the memoized counterpart is reused and the key manager is not
//! called. A value that already matches the target half of the pair is left
//! as is, so repeating a hook is a no-op. Columns are only written after the
//! key manager call succeeds, so a failure leaves the record as it was.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use enverify_common::error::CommonError;
use enverify_domain::{EncryptedFieldSpec, EnverifyError, Result};
use tracing::{debug, error, instrument};

use super::ports::KeyManager;
use crate::record::{EncryptedField, Record};

/// Associated data passed to the key manager for every column.
const ASSOCIATED_DATA: &[u8] = &[];

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Applies [`EncryptedFieldSpec`]s to records.
pub struct FieldEncryptor {
    key_manager: Arc<dyn KeyManager>,
    default_key_id: String,
    timeout: Duration,
}

impl FieldEncryptor {
    pub fn new(
        key_manager: Arc<dyn KeyManager>,
        default_key_id: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self { key_manager, default_key_id: default_key_id.into(), timeout }
    }

    /// Replace the plaintext in `spec.column` with its ciphertext.
    ///
    /// # Errors
    /// - `MissingColumn` when the record lacks a configured column
    /// - `EncryptionFailed` when the key manager fails or times out
    #[instrument(skip_all, fields(table = %spec.table, column = %spec.column))]
    pub async fn encrypt_on_write(
        &self,
        record: &mut dyn Record,
        spec: &EncryptedFieldSpec,
    ) -> Result<()> {
        let key_id = spec.effective_key_id(&self.default_key_id).to_string();
        let table = record.table().to_string();
        let mut field = checked_field(record, &table, spec)?;

        let plaintext = field.value.clone();
        if plaintext.is_empty() {
            debug!("Skipping encryption of blank value");
            return Ok(());
        }

        if let Some(cache) = field.cache.as_ref() {
            if cache.is_populated() && *cache.plaintext == plaintext {
                debug!("Plaintext unchanged, reusing cached ciphertext");
                let ciphertext = cache.ciphertext.clone();
                field.set_value(&ciphertext);
                return Ok(());
            }
            if cache.is_populated() && *cache.ciphertext == plaintext {
                debug!("Value already encrypted");
                return Ok(());
            }
        }

        let sealed = self
            .bounded("encrypt", self.key_manager.encrypt(&key_id, plaintext.as_bytes(), ASSOCIATED_DATA))
            .await
            .map_err(|reason| {
                error!(key_id = %key_id, reason = %reason, "Key manager encrypt failed");
                EnverifyError::EncryptionFailed {
                    table: table.clone(),
                    column: spec.column.clone(),
                    key_id: key_id.clone(),
                    reason,
                }
            })?;

        let ciphertext = STANDARD_NO_PAD.encode(sealed);
        field.set_value(&ciphertext);
        if let Some(cache) = field.cache.as_mut() {
            cache.store(&plaintext, &ciphertext);
        }
        Ok(())
    }

    /// Replace the ciphertext in `spec.column` with its plaintext.
    ///
    /// # Errors
    /// - `MissingColumn` when the record lacks a configured column
    /// - `DecryptionFailed` when decoding, the key manager or UTF-8
    ///   conversion fails, or the call times out
    #[instrument(skip_all, fields(table = %spec.table, column = %spec.column))]
    pub async fn decrypt_on_read(
        &self,
        record: &mut dyn Record,
        spec: &EncryptedFieldSpec,
    ) -> Result<()> {
        let key_id = spec.effective_key_id(&self.default_key_id).to_string();
        let table = record.table().to_string();
        let mut field = checked_field(record, &table, spec)?;

        let ciphertext = field.value.clone();
        if ciphertext.is_empty() {
            debug!("Skipping decryption of blank value");
            return Ok(());
        }

        if let Some(cache) = field.cache.as_ref() {
            if cache.is_populated() && *cache.ciphertext == ciphertext {
                debug!("Ciphertext unchanged, reusing cached plaintext");
                let plaintext = cache.plaintext.clone();
                field.set_value(&plaintext);
                return Ok(());
            }
            if cache.is_populated() && *cache.plaintext == ciphertext {
                debug!("Value already decrypted");
                return Ok(());
            }
        }

        let failed = |reason: String| {
            error!(key_id = %key_id, reason = %reason, "Failed to decrypt column");
            EnverifyError::DecryptionFailed {
                table: table.clone(),
                column: spec.column.clone(),
                key_id: key_id.clone(),
                reason,
            }
        };

        let sealed = decode_ciphertext(&ciphertext).map_err(|e| failed(e.to_string()))?;
        let opened = self
            .bounded("decrypt", self.key_manager.decrypt(&key_id, &sealed, ASSOCIATED_DATA))
            .await
            .map_err(&failed)?;
        let plaintext = String::from_utf8(opened)
            .map_err(|_| failed("plaintext is not valid UTF-8".to_string()))?;

        field.set_value(&plaintext);
        if let Some(cache) = field.cache.as_mut() {
            cache.store(&plaintext, &ciphertext);
        }
        Ok(())
    }

    /// Run a key manager call under the crypto deadline. Errors are flattened
    /// to their display text; a timeout reads like any other failure.
    async fn bounded<F>(&self, operation: &str, call: F) -> std::result::Result<Vec<u8>, String>
    where
        F: Future<Output = std::result::Result<Vec<u8>, CommonError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(EnverifyError::Timeout {
                operation: format!("key manager {operation}"),
                duration: self.timeout,
            }
            .to_string()),
        }
    }
}

/// Decode stored ciphertext in either base64 alphabet, padded or not.
fn decode_ciphertext(encoded: &str) -> std::result::Result<Vec<u8>, CommonError> {
    STANDARD_LENIENT
        .decode(encoded)
        .or_else(|standard| URL_SAFE_LENIENT.decode(encoded).map_err(|_| standard))
        .map_err(CommonError::from)
}

/// Fetch the column view and check that every declared companion exists.
fn checked_field<'r>(
    record: &'r mut dyn Record,
    table: &str,
    spec: &EncryptedFieldSpec,
) -> Result<EncryptedField<'r>> {
    let cache_columns = spec.cache_columns()?;
    let field = record
        .encrypted_field(&spec.column)
        .ok_or_else(|| EnverifyError::missing_column(table, &spec.column))?;

    if let Some((plaintext_column, _)) = cache_columns {
        if field.cache.is_none() {
            return Err(EnverifyError::missing_column(table, plaintext_column));
        }
    }
    if let Some(mirror_column) = spec.mirror_column.as_deref() {
        if field.mirror.is_none() {
            return Err(EnverifyError::missing_column(table, mirror_column));
        }
    }

    // Companions the record offers but the descriptor does not declare are
    // left untouched.
    let EncryptedField { value, cache, mirror } = field;
    Ok(EncryptedField {
        value,
        cache: cache.filter(|_| cache_columns.is_some()),
        mirror: mirror.filter(|_| spec.mirror_column.is_some()),
    })
}
