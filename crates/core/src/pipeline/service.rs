//! Ordered hook stages for one table's records
//!
//! | Stage           | Encrypt | Sign | Decrypt | Observers | Invalidate |
//! |-----------------|---------|------|---------|-----------|------------|
//! | `before_create` | yes     | yes  |         |           |            |
//! | `after_create`  |         |      | yes     | yes       |            |
//! | `before_update` | yes     |      |         |           |            |
//! | `after_update`  |         |      | yes     |           | yes        |
//! | `after_query`   |         |      | yes     |           |            |
//! | `after_delete`  |         |      |         |           | yes        |

use std::sync::Arc;

use enverify_domain::{EnverifyError, HmacFieldSpec, Result};
use tracing::{debug, error, instrument};

use super::ports::MutationObserver;
use super::registry::FieldRegistry;
use crate::encryption::FieldEncryptor;
use crate::invalidation::CacheInvalidator;
use crate::record::Record;
use crate::signing::HmacSigner;

pub struct RecordPipeline {
    registry: Arc<FieldRegistry>,
    encryptor: FieldEncryptor,
    signer: HmacSigner,
    invalidator: CacheInvalidator,
    observers: Vec<Arc<dyn MutationObserver>>,
}

impl RecordPipeline {
    pub fn new(
        registry: Arc<FieldRegistry>,
        encryptor: FieldEncryptor,
        signer: HmacSigner,
        invalidator: CacheInvalidator,
    ) -> Self {
        Self { registry, encryptor, signer, invalidator, observers: Vec::new() }
    }

    pub fn with_observer(mut self, observer: Arc<dyn MutationObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Encrypt and sign protected columns before the row is inserted.
    #[instrument(skip_all, fields(table = %record.table()))]
    pub async fn before_create(&self, record: &mut dyn Record) -> Result<()> {
        self.encrypt_all(record).await?;
        let table = record.table().to_string();
        for spec in self.registry.hmac_fields(&table) {
            self.sign_field(record, spec).await?;
        }
        Ok(())
    }

    /// Restore plaintext on the inserted row and notify observers.
    #[instrument(skip_all, fields(table = %record.table()))]
    pub async fn after_create(&self, record: &mut dyn Record) -> Result<()> {
        self.decrypt_all(record).await?;
        for observer in self.observers.iter().filter(|o| o.table() == record.table()) {
            observer.after_create(&*record).await?;
        }
        Ok(())
    }

    #[instrument(skip_all, fields(table = %record.table()))]
    pub async fn before_update(&self, record: &mut dyn Record) -> Result<()> {
        self.encrypt_all(record).await
    }

    #[instrument(skip_all, fields(table = %record.table()))]
    pub async fn after_update(&self, record: &mut dyn Record) -> Result<()> {
        self.decrypt_all(record).await?;
        self.invalidate(&*record).await
    }

    #[instrument(skip_all, fields(table = %record.table()))]
    pub async fn after_query(&self, record: &mut dyn Record) -> Result<()> {
        self.decrypt_all(record).await
    }

    #[instrument(skip_all, fields(table = %record.table()))]
    pub async fn after_delete(&self, record: &dyn Record) -> Result<()> {
        self.invalidate(record).await
    }

    async fn encrypt_all(&self, record: &mut dyn Record) -> Result<()> {
        let table = record.table().to_string();
        for spec in self.registry.encrypted_fields(&table) {
            self.encryptor.encrypt_on_write(record, spec).await?;
        }
        Ok(())
    }

    async fn decrypt_all(&self, record: &mut dyn Record) -> Result<()> {
        let table = record.table().to_string();
        for spec in self.registry.encrypted_fields(&table) {
            self.encryptor.decrypt_on_read(record, spec).await?;
        }
        Ok(())
    }

    async fn invalidate(&self, record: &dyn Record) -> Result<()> {
        let rules = self.registry.invalidation_rules(record.table());
        self.invalidator.invalidate_all(record, rules).await
    }

    async fn sign_field(&self, record: &mut dyn Record, spec: &HmacFieldSpec) -> Result<()> {
        let table = record.table().to_string();
        let plaintext = record
            .hmac_field(&spec.column)
            .map(|value| value.clone())
            .ok_or_else(|| EnverifyError::missing_column(&table, &spec.column))?;
        if plaintext.is_empty() {
            debug!(column = %spec.column, "Skipping signature of blank value");
            return Ok(());
        }

        let signature =
            self.signer.sign_with_class(spec.secret_class, &plaintext).await.map_err(|e| {
                error!(column = %spec.column, secret_class = %spec.secret_class, error = %e, "Failed to sign column");
                e
            })?;

        if let Some(value) = record.hmac_field(&spec.column) {
            *value = signature;
        }
        Ok(())
    }
}

impl std::fmt::Debug for RecordPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordPipeline")
            .field("tables", &self.registry.tables())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
