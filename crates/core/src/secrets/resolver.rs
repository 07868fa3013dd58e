//! Resolves secret classes to ordered key sets
//!
//! Resolved sets are cached per class for a configurable TTL so steady-state
//! traffic does not hit the secret store. Concurrent misses for the same
//! class are coalesced into one fetch, and a refresh replaces the cached
//! `Arc` atomically, so readers see either the old set or the new one.

use std::sync::Arc;
use std::time::Duration;

use enverify_domain::{EnverifyError, ResolvedSecretSet, Result, SecretClass, SecretsConfig};
use moka::future::Cache;
use tracing::{debug, info, instrument, warn};

use super::ports::SecretStore;

/// Upper bound on cached classes; there are only a handful.
const MAX_CACHED_CLASSES: u64 = 64;

/// Caching front for a [`SecretStore`].
pub struct SecretResolver {
    store: Arc<dyn SecretStore>,
    cache: Cache<SecretClass, Arc<ResolvedSecretSet>>,
    default_timeout: Duration,
}

impl SecretResolver {
    pub fn new(store: Arc<dyn SecretStore>, ttl: Duration, default_timeout: Duration) -> Self {
        let cache = Cache::builder().max_capacity(MAX_CACHED_CLASSES).time_to_live(ttl).build();
        Self { store, cache, default_timeout }
    }

    pub fn from_config(store: Arc<dyn SecretStore>, config: &SecretsConfig) -> Self {
        Self::new(store, config.cache_ttl(), config.resolve_timeout())
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Resolve `class` within the configured default deadline.
    pub async fn resolve(&self, class: SecretClass) -> Result<Arc<ResolvedSecretSet>> {
        self.resolve_within(class, self.default_timeout).await
    }

    /// Resolve `class`, giving up after `deadline`.
    ///
    /// # Errors
    /// - `SecretUnavailable` when the store fails or the deadline passes
    /// - `NoKeyConfigured` when the store returns no keys
    #[instrument(skip_all, fields(secret_class = %class))]
    pub async fn resolve_within(
        &self,
        class: SecretClass,
        deadline: Duration,
    ) -> Result<Arc<ResolvedSecretSet>> {
        let lookup = self.cache.try_get_with(class, self.fetch(class));

        match tokio::time::timeout(deadline, lookup).await {
            Ok(Ok(set)) => Ok(set),
            Ok(Err(err)) => Err((*err).clone()),
            Err(_) => {
                let timeout = EnverifyError::Timeout {
                    operation: format!("resolve {class}"),
                    duration: deadline,
                };
                warn!(
                    deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                    "Secret resolution timed out"
                );
                Err(EnverifyError::SecretUnavailable { class, reason: timeout.to_string() })
            }
        }
    }

    /// Drop the cached set for `class` and fetch it again.
    pub async fn refresh(&self, class: SecretClass) -> Result<Arc<ResolvedSecretSet>> {
        self.cache.invalidate(&class).await;
        self.resolve(class).await
    }

    /// Drop every cached set; the next resolve of each class hits the store.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    async fn fetch(&self, class: SecretClass) -> Result<Arc<ResolvedSecretSet>> {
        debug!("Fetching key material from secret store");

        let keys = self.store.fetch_secret(class).await.map_err(|e| {
            warn!(error = %e, "Secret store could not supply key material");
            EnverifyError::SecretUnavailable { class, reason: e.to_string() }
        })?;

        let set = ResolvedSecretSet::new(class, keys)?;
        info!(
            keys = set.len(),
            retired_keys = set.retired_count(),
            "Resolved key material"
        );
        Ok(Arc::new(set))
    }
}

impl std::fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretResolver")
            .field("cached_classes", &self.cache.entry_count())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}
