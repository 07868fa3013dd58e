//! Key manager adapters

pub mod local;

pub use local::LocalKeyManager;
