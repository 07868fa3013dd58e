//! Static per-table lookup of field descriptors

use std::collections::{BTreeSet, HashMap};

use enverify_domain::{
    CacheInvalidationRule, Config, EncryptedFieldSpec, HmacFieldSpec, Result,
};

/// Descriptors grouped by table, built once at start-up.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    encrypted: HashMap<String, Vec<EncryptedFieldSpec>>,
    hmac: HashMap<String, Vec<HmacFieldSpec>>,
    invalidation: HashMap<String, Vec<CacheInvalidationRule>>,
}

impl FieldRegistry {
    /// Validate `config` and index its descriptors.
    ///
    /// # Errors
    /// `Configuration` for any descriptor `Config::validate` rejects.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut registry = Self::default();
        for spec in &config.encrypted_fields {
            registry.encrypted.entry(spec.table.clone()).or_default().push(spec.clone());
        }
        for spec in &config.hmac_fields {
            registry.hmac.entry(spec.table.clone()).or_default().push(spec.clone());
        }
        for rule in &config.cache_invalidation {
            registry.invalidation.entry(rule.table.clone()).or_default().push(rule.clone());
        }
        Ok(registry)
    }

    pub fn encrypted_fields(&self, table: &str) -> &[EncryptedFieldSpec] {
        self.encrypted.get(table).map_or(&[], Vec::as_slice)
    }

    pub fn hmac_fields(&self, table: &str) -> &[HmacFieldSpec] {
        self.hmac.get(table).map_or(&[], Vec::as_slice)
    }

    pub fn invalidation_rules(&self, table: &str) -> &[CacheInvalidationRule] {
        self.invalidation.get(table).map_or(&[], Vec::as_slice)
    }

    /// Every table with at least one descriptor, sorted.
    pub fn tables(&self) -> BTreeSet<&str> {
        self.encrypted
            .keys()
            .chain(self.hmac.keys())
            .chain(self.invalidation.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.encrypted.is_empty() && self.hmac.is_empty() && self.invalidation.is_empty()
    }
}
