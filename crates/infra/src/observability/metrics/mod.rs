//! Prometheus collectors

pub mod audit;

pub use audit::{AuditEntryObserver, AuditMetrics, AUDIT_ENTRIES_CREATED};
