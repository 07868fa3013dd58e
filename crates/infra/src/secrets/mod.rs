//! Secret store adapters

pub mod env;
pub mod memory;

pub use env::EnvSecretStore;
pub use memory::InMemorySecretStore;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use enverify_common::error::CommonError;

/// Decode base64 keys, newest first. Blank entries are skipped.
fn decode_keys<'a>(
    source: &str,
    encoded: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<Vec<u8>>, CommonError> {
    encoded
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
        .map(|(position, entry)| {
            STANDARD.decode(entry).map_err(|e| {
                CommonError::config_field(source, format!("key at position {position} is not valid base64: {e}"))
            })
        })
        .collect()
}
