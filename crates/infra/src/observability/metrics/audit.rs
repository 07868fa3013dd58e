//! Audit-entry creation counter
//!
//! Counts committed creates on `audit_entries` per realm. Entries without a
//! realm are counted under an empty `realm_id` label. The counter is fed by
//! [`AuditEntryObserver`], which the pipeline calls after each create.

use std::sync::Arc;

use async_trait::async_trait;
use enverify_core::{MutationObserver, Record};
use enverify_domain::constants::AUDIT_ENTRIES_TABLE;
use enverify_domain::{EnverifyError, Result};
use prometheus::{IntCounterVec, Opts, Registry};
use tracing::error;

pub const AUDIT_ENTRIES_CREATED: &str = "enverify_audit_entries_created_total";

const REALM_ID_COLUMN: &str = "realm_id";

#[derive(Clone)]
pub struct AuditMetrics {
    created: IntCounterVec,
}

impl AuditMetrics {
    /// Create the collectors and register them with `registry`.
    ///
    /// # Errors
    /// `Configuration` when a collector with the same name is already
    /// registered.
    pub fn new(registry: &Registry) -> Result<Self> {
        let created = IntCounterVec::new(
            Opts::new(AUDIT_ENTRIES_CREATED, "Audit entries created, by realm"),
            &[REALM_ID_COLUMN],
        )
        .map_err(metrics_error)?;
        registry.register(Box::new(created.clone())).map_err(metrics_error)?;
        Ok(Self { created })
    }

    pub fn record_created(&self, realm_id: Option<u64>) {
        self.created.with_label_values(&[realm_label(realm_id).as_str()]).inc();
    }

    pub fn created(&self, realm_id: Option<u64>) -> u64 {
        self.created.with_label_values(&[realm_label(realm_id).as_str()]).get()
    }
}

impl std::fmt::Debug for AuditMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditMetrics").finish_non_exhaustive()
    }
}

fn realm_label(realm_id: Option<u64>) -> String {
    realm_id.map(|id| id.to_string()).unwrap_or_default()
}

fn metrics_error(e: prometheus::Error) -> EnverifyError {
    EnverifyError::Configuration(format!("metric {AUDIT_ENTRIES_CREATED}: {e}"))
}

/// Increments the audit counter after each `audit_entries` create.
#[derive(Debug, Clone)]
pub struct AuditEntryObserver {
    metrics: Arc<AuditMetrics>,
}

impl AuditEntryObserver {
    pub fn new(metrics: Arc<AuditMetrics>) -> Self {
        Self { metrics }
    }
}

#[async_trait]
impl MutationObserver for AuditEntryObserver {
    fn table(&self) -> &str {
        AUDIT_ENTRIES_TABLE
    }

    async fn after_create(&self, record: &dyn Record) -> Result<()> {
        let realm_id = record
            .column_text(REALM_ID_COLUMN)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| {
                    let err = EnverifyError::InvalidValue {
                        table: record.table().to_string(),
                        column: REALM_ID_COLUMN.to_string(),
                        reason: format!("realm id is not numeric: {e}"),
                    };
                    error!(error = %err, "Failed to record audit metric");
                    err
                })
            })
            .transpose()?;

        self.metrics.record_created(realm_id);
        Ok(())
    }
}
