//! Persistence hook points
//!
//! The persistence layer calls one [`RecordPipeline`] stage around each
//! create, update, query and delete. A returned error must abort the
//! enclosing transaction.

pub mod ports;
pub mod registry;
pub mod service;

pub use registry::FieldRegistry;
pub use service::RecordPipeline;
