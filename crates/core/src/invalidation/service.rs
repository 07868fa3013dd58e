//! Cache eviction driven by [`CacheInvalidationRule`]s
//!
//! A failed delete is logged and swallowed: the mutation has already been
//! persisted and a stale cache entry expires on its own.

use std::sync::Arc;

use enverify_domain::{CacheInvalidationRule, CacheKey, EnverifyError, Result};
use tracing::{debug, instrument, warn};

use super::ports::Cacher;
use crate::record::Record;

#[derive(Clone)]
pub struct CacheInvalidator {
    cacher: Arc<dyn Cacher>,
}

impl CacheInvalidator {
    pub fn new(cacher: Arc<dyn Cacher>) -> Self {
        Self { cacher }
    }

    /// Build the cache key a rule addresses for `record`.
    ///
    /// Column values are joined with `|` in the order the rule lists them.
    pub fn cache_key(record: &dyn Record, rule: &CacheInvalidationRule) -> Result<CacheKey> {
        let parts = rule
            .columns
            .iter()
            .map(|column| {
                record
                    .column_text(column)
                    .ok_or_else(|| EnverifyError::missing_column(record.table(), column))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CacheKey::composite(rule.namespace.as_str(), parts.as_slice()))
    }

    /// Evict the entry `rule` addresses for `record`.
    ///
    /// # Errors
    /// Only `MissingColumn`; cache failures are logged, never returned.
    #[instrument(skip_all, fields(namespace = %rule.namespace, table = %rule.table))]
    pub async fn invalidate(&self, record: &dyn Record, rule: &CacheInvalidationRule) -> Result<()> {
        let key = Self::cache_key(record, rule)?;

        match self.cacher.delete(&key.namespace, &key.key).await {
            Ok(()) => debug!(cache_key = %key, "Evicted cache entry"),
            Err(e) => {
                let err = EnverifyError::Cache {
                    namespace: key.namespace.clone(),
                    key: key.key.clone(),
                    reason: e.to_string(),
                };
                warn!(cache_key = %key, error = %err, "Cache invalidation failed, continuing");
            }
        }
        Ok(())
    }

    /// Apply every rule in order.
    pub async fn invalidate_all(
        &self,
        record: &dyn Record,
        rules: &[CacheInvalidationRule],
    ) -> Result<()> {
        for rule in rules {
            self.invalidate(record, rule).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for CacheInvalidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheInvalidator").finish_non_exhaustive()
    }
}
