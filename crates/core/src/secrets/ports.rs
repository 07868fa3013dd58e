//! Port interface for the secret store

use async_trait::async_trait;
use enverify_common::error::CommonError;
use enverify_domain::SecretClass;

/// Source of raw key material per secret class.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Keys for `class`, newest first. An empty list is returned as-is; the
    /// resolver decides that it is a configuration error.
    async fn fetch_secret(&self, class: SecretClass) -> Result<Vec<Vec<u8>>, CommonError>;
}
