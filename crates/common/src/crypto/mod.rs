//! Shared cryptographic primitives.

#[cfg(feature = "runtime")]
pub mod encryption;
pub mod hmac;

#[cfg(feature = "runtime")]
pub use encryption::EncryptionService;
pub use hmac::{fingerprint, hmac_sha512, sign_url_safe};
