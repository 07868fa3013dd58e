//! HMAC signer over resolved key sets
//!
//! New values are always signed with the primary key. Lookups during a
//! rotation window must match against every signature returned by
//! [`HmacSigner::all_signatures`], because a stored value may have been
//! signed with a key that has since been retired.

use std::sync::Arc;

use enverify_common::crypto::hmac::sign_url_safe;
use enverify_domain::{EnverifyError, ResolvedSecretSet, Result, SecretClass};

use crate::secrets::SecretResolver;

/// Signs plaintext with keys from a [`SecretResolver`].
#[derive(Debug, Clone)]
pub struct HmacSigner {
    resolver: Arc<SecretResolver>,
}

impl HmacSigner {
    pub fn new(resolver: Arc<SecretResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<SecretResolver> {
        &self.resolver
    }

    /// Signature of `plaintext` under the primary key of `keys`.
    ///
    /// Callers skip empty values before signing; an empty plaintext is still
    /// signed if passed.
    pub fn sign(plaintext: &str, keys: &ResolvedSecretSet) -> Result<String> {
        sign_one(keys.primary(), plaintext)
    }

    /// One signature per key, primary first.
    pub fn all_signatures(plaintext: &str, keys: &ResolvedSecretSet) -> Result<Vec<String>> {
        keys.iter().map(|key| sign_one(key, plaintext)).collect()
    }

    /// Resolve `class` and sign with its primary key.
    pub async fn sign_with_class(&self, class: SecretClass, plaintext: &str) -> Result<String> {
        let keys = self.resolver.resolve(class).await?;
        Self::sign(plaintext, &keys)
    }

    /// Resolve `class` and sign with every allowed key.
    pub async fn all_signatures_with_class(
        &self,
        class: SecretClass,
        plaintext: &str,
    ) -> Result<Vec<String>> {
        let keys = self.resolver.resolve(class).await?;
        Self::all_signatures(plaintext, &keys)
    }
}

fn sign_one(key: &[u8], plaintext: &str) -> Result<String> {
    sign_url_safe(key, plaintext.as_bytes())
        .map_err(|e| EnverifyError::SigningFailed { reason: e.to_string() })
}
