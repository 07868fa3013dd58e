//! Keyed hashing primitive (HMAC-SHA512).
//!
//! Signatures are deterministic for a given `(key, message)` pair so they
//! can double as equality-lookup indexes. The digest is rendered as
//! unpadded URL-safe base64.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

use crate::error::{CommonError, CommonResult};

type HmacSha512 = Hmac<Sha512>;

/// Raw HMAC-SHA512 digest of `message` under `key`.
pub fn hmac_sha512(key: &[u8], message: &[u8]) -> CommonResult<Vec<u8>> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| CommonError::crypto("hmac", format!("invalid key: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// HMAC-SHA512 digest of `message` under `key`, URL-safe base64 without
/// padding.
pub fn sign_url_safe(key: &[u8], message: &[u8]) -> CommonResult<String> {
    hmac_sha512(key, message).map(|digest| URL_SAFE_NO_PAD.encode(digest))
}

/// First eight bytes of the SHA-256 of `material`, base64 encoded.
///
/// Safe to log; used to tell keys apart without revealing them.
pub fn fingerprint(material: &[u8]) -> String {
    let digest = Sha256::digest(material);
    STANDARD_NO_PAD.encode(&digest[..8])
}
