//! Static descriptors for protected columns and cache invalidation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CIPHERTEXT_CACHE_SUFFIX, COMPOSITE_KEY_SEPARATOR, MIRROR_SUFFIX, PLAINTEXT_CACHE_SUFFIX,
};
use crate::errors::{EnverifyError, Result};
use crate::types::SecretClass;

/// A column encrypted at rest through the key manager.
///
/// The plaintext-cache and ciphertext-cache columns memoize the last
/// plaintext/ciphertext pair. They must be declared together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedFieldSpec {
    pub table: String,
    pub column: String,
    /// Key identifier passed to the key manager. `None` falls back to
    /// `keys.encryption_key_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaintext_cache_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciphertext_cache_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_column: Option<String>,
}

impl EncryptedFieldSpec {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            key_id: None,
            plaintext_cache_column: None,
            ciphertext_cache_column: None,
            mirror_column: None,
        }
    }

    /// Descriptor with `<column>_plaintext_cache`, `<column>_ciphertext_cache`
    /// and `<column>_ptr` companions.
    pub fn with_default_companions(table: impl Into<String>, column: impl Into<String>) -> Self {
        let column = column.into();
        let plaintext = format!("{column}{PLAINTEXT_CACHE_SUFFIX}");
        let ciphertext = format!("{column}{CIPHERTEXT_CACHE_SUFFIX}");
        let mirror = format!("{column}{MIRROR_SUFFIX}");
        Self::new(table, column).with_cache_columns(plaintext, ciphertext).with_mirror(mirror)
    }

    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    pub fn with_cache_columns(
        mut self,
        plaintext: impl Into<String>,
        ciphertext: impl Into<String>,
    ) -> Self {
        self.plaintext_cache_column = Some(plaintext.into());
        self.ciphertext_cache_column = Some(ciphertext.into());
        self
    }

    pub fn with_mirror(mut self, mirror: impl Into<String>) -> Self {
        self.mirror_column = Some(mirror.into());
        self
    }

    /// The declared cache pair, or `None` when no cache is declared.
    ///
    /// # Errors
    /// `Configuration` when only one of the two cache columns is declared.
    pub fn cache_columns(&self) -> Result<Option<(&str, &str)>> {
        match (self.plaintext_cache_column.as_deref(), self.ciphertext_cache_column.as_deref()) {
            (Some(pt), Some(ct)) => Ok(Some((pt, ct))),
            (None, None) => Ok(None),
            _ => Err(EnverifyError::Configuration(format!(
                "{}.{} declares only one of plaintext_cache_column/ciphertext_cache_column",
                self.table, self.column
            ))),
        }
    }

    /// Key identifier for this column, falling back to `default_key_id`.
    pub fn effective_key_id<'a>(&'a self, default_key_id: &'a str) -> &'a str {
        self.key_id.as_deref().unwrap_or(default_key_id)
    }
}

/// A column holding an HMAC of its plaintext, used as a lookup index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmacFieldSpec {
    pub table: String,
    pub column: String,
    pub secret_class: SecretClass,
}

impl HmacFieldSpec {
    pub fn new(table: impl Into<String>, column: impl Into<String>, class: SecretClass) -> Self {
        Self { table: table.into(), column: column.into(), secret_class: class }
    }
}

/// Cache entry to purge after an update or delete on `table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheInvalidationRule {
    pub namespace: String,
    pub table: String,
    /// Identifying columns, in composite-key order.
    pub columns: Vec<String>,
}

impl CacheInvalidationRule {
    pub fn new<I, S>(namespace: impl Into<String>, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace: namespace.into(),
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Address of one entry in the external cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: String,
    pub key: String,
}

impl CacheKey {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), key: key.into() }
    }

    /// Joins `values` with the pipe separator, preserving order.
    pub fn composite<S: AsRef<str>>(namespace: impl Into<String>, values: &[S]) -> Self {
        let key = values.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(COMPOSITE_KEY_SEPARATOR);
        Self::new(namespace, key)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.key)
    }
}
