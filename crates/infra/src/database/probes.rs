//! Connectivity probes run before the hooks are registered

use std::sync::Arc;

use async_trait::async_trait;
use enverify_core::{KeyManager, SecretStore};
use enverify_domain::SecretClass;

use crate::errors::ConnectivityError;

const CANARY: &[u8] = b"enverify-connectivity-canary";

/// One start-up dependency that must answer before traffic is served.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> Result<(), ConnectivityError>;
}

/// Seals and opens a canary under the configured key id.
pub struct KeyManagerProbe {
    key_manager: Arc<dyn KeyManager>,
    key_id: String,
}

impl KeyManagerProbe {
    pub fn new(key_manager: Arc<dyn KeyManager>, key_id: impl Into<String>) -> Self {
        Self { key_manager, key_id: key_id.into() }
    }
}

#[async_trait]
impl ConnectivityProbe for KeyManagerProbe {
    fn name(&self) -> &str {
        "key_manager"
    }

    async fn check(&self) -> Result<(), ConnectivityError> {
        let sealed = self
            .key_manager
            .encrypt(&self.key_id, CANARY, &[])
            .await
            .map_err(|e| ConnectivityError::from_common(self.name(), &e))?;
        let opened = self
            .key_manager
            .decrypt(&self.key_id, &sealed, &[])
            .await
            .map_err(|e| ConnectivityError::from_common(self.name(), &e))?;

        if opened != CANARY {
            return Err(ConnectivityError::rejected(self.name(), "canary did not round-trip"));
        }
        Ok(())
    }
}

/// Fetches one secret class to prove the store answers.
pub struct SecretStoreProbe {
    store: Arc<dyn SecretStore>,
    class: SecretClass,
}

impl SecretStoreProbe {
    pub fn new(store: Arc<dyn SecretStore>, class: SecretClass) -> Self {
        Self { store, class }
    }
}

#[async_trait]
impl ConnectivityProbe for SecretStoreProbe {
    fn name(&self) -> &str {
        "secret_store"
    }

    async fn check(&self) -> Result<(), ConnectivityError> {
        self.store
            .fetch_secret(self.class)
            .await
            .map(|_| ())
            .map_err(|e| ConnectivityError::from_common(self.name(), &e))
    }
}
