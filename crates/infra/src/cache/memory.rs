//! moka-backed lookup cache for single-instance deployments

use std::time::Duration;

use async_trait::async_trait;
use enverify_common::error::CommonError;
use enverify_core::Cacher;
use moka::future::Cache;
use tracing::debug;

const DEFAULT_CAPACITY: u64 = 10_000;
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Lookup cache addressed by `(namespace, key)`.
#[derive(Clone)]
pub struct InMemoryCacher {
    cache: Cache<(String, String), String>,
}

impl InMemoryCacher {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self { cache: Cache::builder().max_capacity(capacity).time_to_live(ttl).build() }
    }

    pub async fn set(&self, namespace: &str, key: &str, value: impl Into<String>) {
        self.cache.insert((namespace.to_string(), key.to_string()), value.into()).await;
    }

    pub async fn get(&self, namespace: &str, key: &str) -> Option<String> {
        self.cache.get(&(namespace.to_string(), key.to_string())).await
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for InMemoryCacher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

#[async_trait]
impl Cacher for InMemoryCacher {
    async fn delete(&self, namespace: &str, key: &str) -> Result<(), CommonError> {
        self.cache.invalidate(&(namespace.to_string(), key.to_string())).await;
        debug!(namespace, cache_key = key, "Deleted cache entry");
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryCacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCacher").field("entries", &self.cache.entry_count()).finish()
    }
}
