//! Environment-variable secret store
//!
//! Each class reads `<prefix><CLASS>` (for example
//! `ENVERIFY_SECRET_VERIFICATION_CODE_DATABASE_HMAC`) holding comma-separated
//! base64 keys, newest first.

use async_trait::async_trait;
use enverify_common::error::CommonError;
use enverify_core::SecretStore;
use enverify_domain::{SecretClass, SecretsConfig};
use tracing::debug;

use super::decode_keys;

#[derive(Debug, Clone)]
pub struct EnvSecretStore {
    prefix: String,
}

impl EnvSecretStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn from_config(config: &SecretsConfig) -> Self {
        Self::new(config.env_prefix.clone())
    }

    /// Variable consulted for `class`.
    pub fn variable(&self, class: SecretClass) -> String {
        format!("{}{}", self.prefix, class.env_suffix())
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn fetch_secret(&self, class: SecretClass) -> Result<Vec<Vec<u8>>, CommonError> {
        let variable = self.variable(class);
        let raw = std::env::var(&variable)
            .map_err(|_| CommonError::not_found_with_id("environment variable", variable.as_str()))?;
        let keys = decode_keys(&variable, raw.split(','))?;
        debug!(variable = %variable, keys = keys.len(), "Read secret from environment");
        Ok(keys)
    }
}
