//! Best-effort cache eviction after record mutations

pub mod ports;
pub mod service;

pub use service::CacheInvalidator;
