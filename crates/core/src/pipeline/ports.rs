//! Port interface for side effects that follow a committed create

use async_trait::async_trait;
use enverify_domain::Result;

use crate::record::Record;

/// Reacts to records created on one table.
#[async_trait]
pub trait MutationObserver: Send + Sync {
    /// Table whose creates this observer wants to see.
    fn table(&self) -> &str;

    async fn after_create(&self, record: &dyn Record) -> Result<()>;
}
