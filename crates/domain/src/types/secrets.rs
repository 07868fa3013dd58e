//! Secret classes and resolved key sets

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::{EnverifyError, Result};
use crate::impl_tag_conversions;

/// Category of key material held by the secret store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretClass {
    /// Session cookie signing and encryption keys
    CookieKeys,
    /// HMAC keys for API keys stored in the database
    ApiKeyDatabaseHmac,
    /// HMAC keys for API key signatures
    ApiKeySignatureHmac,
    /// HMAC keys for phone numbers stored in the database
    PhoneNumberDatabaseHmac,
    /// HMAC keys for verification codes stored in the database
    VerificationCodeDatabaseHmac,
}

impl_tag_conversions!(SecretClass {
    CookieKeys => "cookie_keys",
    ApiKeyDatabaseHmac => "api_key_database_hmac",
    ApiKeySignatureHmac => "api_key_signature_hmac",
    PhoneNumberDatabaseHmac => "phone_number_database_hmac",
    VerificationCodeDatabaseHmac => "verification_code_database_hmac",
});

impl SecretClass {
    pub const ALL: [SecretClass; 5] = [
        Self::CookieKeys,
        Self::ApiKeyDatabaseHmac,
        Self::ApiKeySignatureHmac,
        Self::PhoneNumberDatabaseHmac,
        Self::VerificationCodeDatabaseHmac,
    ];

    /// Upper-case suffix used to build environment variable names.
    pub fn env_suffix(&self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

/// Ordered, non-empty key material for one [`SecretClass`].
///
/// Element 0 is the primary key used for every new encryption or
/// signature. The tail holds retired keys that stay valid for verification
/// until operators drop them from the store. Key bytes are zeroed on drop.
#[derive(Clone)]
pub struct ResolvedSecretSet {
    class: SecretClass,
    keys: Vec<Zeroizing<Vec<u8>>>,
}

impl ResolvedSecretSet {
    /// Build a set, newest key first.
    ///
    /// # Errors
    /// `NoKeyConfigured` when `keys` is empty, `Configuration` when any key
    /// is zero-length.
    pub fn new(class: SecretClass, keys: Vec<Vec<u8>>) -> Result<Self> {
        if keys.is_empty() {
            return Err(EnverifyError::NoKeyConfigured { class });
        }
        if let Some(position) = keys.iter().position(Vec::is_empty) {
            return Err(EnverifyError::Configuration(format!(
                "{class} key at position {position} is empty"
            )));
        }

        Ok(Self { class, keys: keys.into_iter().map(Zeroizing::new).collect() })
    }

    pub fn class(&self) -> SecretClass {
        self.class
    }

    /// The current key.
    pub fn primary(&self) -> &[u8] {
        // `new` guarantees at least one key
        self.keys[0].as_slice()
    }

    /// Keys still accepted for verification, oldest last.
    pub fn retired(&self) -> impl Iterator<Item = &[u8]> {
        self.keys[1..].iter().map(|k| k.as_slice())
    }

    /// Every key, primary first.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.keys.iter().map(|k| k.as_slice())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn retired_count(&self) -> usize {
        self.keys.len() - 1
    }
}

impl fmt::Debug for ResolvedSecretSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSecretSet")
            .field("class", &self.class)
            .field("keys", &format_args!("[{} redacted]", self.keys.len()))
            .finish()
    }
}
