//! Port interface for the shared lookup cache

use async_trait::async_trait;
use enverify_common::error::CommonError;

/// Keyed cache shared by every server instance.
///
/// Entries are addressed by namespace and key; never by range or scan.
#[async_trait]
pub trait Cacher: Send + Sync {
    async fn delete(&self, namespace: &str, key: &str) -> Result<(), CommonError>;
}
