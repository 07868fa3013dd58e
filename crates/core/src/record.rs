//! Typed column access for persisted entities
//!
//! Each entity that carries a protected column implements [`Record`] and
//! hands out mutable views of the columns the registry asks for by name.
//! Unknown names return `None`; the pipeline turns that into
//! `MissingColumn` when the column was configured.

/// Mutable view of the plaintext/ciphertext memo columns.
pub struct CachePair<'a> {
    pub plaintext: &'a mut String,
    pub ciphertext: &'a mut String,
}

impl CachePair<'_> {
    /// Both halves hold a value.
    pub fn is_populated(&self) -> bool {
        !self.plaintext.is_empty() && !self.ciphertext.is_empty()
    }

    pub fn store(&mut self, plaintext: &str, ciphertext: &str) {
        *self.plaintext = plaintext.to_string();
        *self.ciphertext = ciphertext.to_string();
    }
}

/// Mutable view of an encrypted column and its optional companions.
pub struct EncryptedField<'a> {
    /// Plaintext before a write and after a read; ciphertext in between.
    pub value: &'a mut String,
    pub cache: Option<CachePair<'a>>,
    /// Nullable mirror of `value` for callers that want `Option` semantics.
    pub mirror: Option<&'a mut Option<String>>,
}

impl<'a> EncryptedField<'a> {
    pub fn new(value: &'a mut String) -> Self {
        Self { value, cache: None, mirror: None }
    }

    pub fn with_cache(mut self, plaintext: &'a mut String, ciphertext: &'a mut String) -> Self {
        self.cache = Some(CachePair { plaintext, ciphertext });
        self
    }

    pub fn with_mirror(mut self, mirror: &'a mut Option<String>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Write `content` into the column and its mirror.
    pub(crate) fn set_value(&mut self, content: &str) {
        *self.value = content.to_string();
        if let Some(mirror) = self.mirror.as_deref_mut() {
            *mirror = (!content.is_empty()).then(|| content.to_string());
        }
    }
}

/// An entity whose columns the pipeline can read and rewrite.
pub trait Record: Send + Sync {
    /// Table this record is persisted to.
    fn table(&self) -> &str;

    fn encrypted_field(&mut self, _column: &str) -> Option<EncryptedField<'_>> {
        None
    }

    fn hmac_field(&mut self, _column: &str) -> Option<&mut String> {
        None
    }

    /// Text form of a column, used for cache keys and observers.
    fn column_text(&self, _column: &str) -> Option<String> {
        None
    }
}
