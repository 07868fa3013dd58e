//! Handling of raw key material.

pub mod secret;

pub use secret::SecretBytes;
