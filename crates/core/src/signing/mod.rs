//! Deterministic HMAC signatures used as lookup indexes

pub mod hmac;

pub use hmac::HmacSigner;
