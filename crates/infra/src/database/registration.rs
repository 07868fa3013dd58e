//! Slot the record hooks are registered into.
//!
//! The persistence layer cannot take a second set of hooks, so a slot is
//! filled at most once. [`HookRegistry::process`] is the slot shared by every
//! facade in the process.

use std::future::Future;
use std::sync::{Arc, OnceLock};

use enverify_core::RecordPipeline;
use enverify_domain::EnverifyError;
use tokio::sync::Mutex;

use crate::errors::StartupError;

#[derive(Default)]
pub struct HookRegistry {
    gate: Mutex<()>,
    hooks: OnceLock<Arc<RecordPipeline>>,
}

impl HookRegistry {
    /// A slot independent of the process-wide one.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The process-wide slot.
    pub fn process() -> Arc<Self> {
        static PROCESS: OnceLock<Arc<HookRegistry>> = OnceLock::new();
        PROCESS.get_or_init(HookRegistry::new).clone()
    }

    pub fn get(&self) -> Option<&Arc<RecordPipeline>> {
        self.hooks.get()
    }

    pub fn is_registered(&self) -> bool {
        self.hooks.get().is_some()
    }

    /// Run `checks` and, if they pass, register `pipeline`.
    ///
    /// Callers are serialized: a second caller waits for the first and then
    /// fails without running its checks.
    ///
    /// # Errors
    /// - whatever `checks` returns
    /// - `Configuration("hooks already registered")` when the slot is taken
    pub async fn register<F>(
        &self,
        pipeline: Arc<RecordPipeline>,
        checks: F,
    ) -> Result<Arc<RecordPipeline>, StartupError>
    where
        F: Future<Output = Result<(), StartupError>>,
    {
        let _held = self.gate.lock().await;
        if self.is_registered() {
            return Err(already_registered().into());
        }

        checks.await?;

        self.hooks.set(pipeline.clone()).map_err(|_| already_registered())?;
        Ok(pipeline)
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry").field("registered", &self.is_registered()).finish()
    }
}

fn already_registered() -> EnverifyError {
    EnverifyError::config("hooks already registered")
}
