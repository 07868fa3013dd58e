//! Configuration loader
//!
//! Loads the field-encryption configuration from environment variables or
//! files, then validates it. A configuration that fails validation is fatal
//! at start-up.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment when one exists
//! 2. Attempts to load from environment variables
//! 3. Only if the required key id variable is unset, falls back to loading
//!    from file; any other environment error is returned
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ENVERIFY_ENCRYPTION_KEY_ID`: Key identifier for encrypted columns
//!   (required)
//! - `ENVERIFY_CRYPTO_TIMEOUT_MS`: Deadline for each key manager call
//! - `ENVERIFY_SECRET_CACHE_TTL_SECONDS`: Lifetime of resolved key sets
//! - `ENVERIFY_STARTUP_MAX_ATTEMPTS`: Connectivity attempts at start-up
//! - `ENVERIFY_STARTUP_RETRY_DELAY_MS`: Delay between connectivity attempts
//!
//! Field descriptors cannot be set from the environment; the defaults apply.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./enverify.json` or `./enverify.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use enverify_domain::{Config, EnverifyError, Result};

pub const ENV_ENCRYPTION_KEY_ID: &str = "ENVERIFY_ENCRYPTION_KEY_ID";
pub const ENV_CRYPTO_TIMEOUT_MS: &str = "ENVERIFY_CRYPTO_TIMEOUT_MS";
pub const ENV_SECRET_CACHE_TTL_SECONDS: &str = "ENVERIFY_SECRET_CACHE_TTL_SECONDS";
pub const ENV_STARTUP_MAX_ATTEMPTS: &str = "ENVERIFY_STARTUP_MAX_ATTEMPTS";
pub const ENV_STARTUP_RETRY_DELAY_MS: &str = "ENVERIFY_STARTUP_RETRY_DELAY_MS";

const CONFIG_FILE_NAMES: [&str; 4] = ["enverify.json", "enverify.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// Loads from environment variables when the key id variable is set, and
/// from a config file otherwise. Once the key id is set, a bad optional
/// variable or a failed validation is returned rather than masked by a file.
///
/// # Errors
/// Returns `EnverifyError::Configuration` if:
/// - An environment variable does not parse
/// - No config file is found when the key id variable is unset
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) => tracing::debug!(error = %e, "No .env file loaded"),
    }

    if std::env::var_os(ENV_ENCRYPTION_KEY_ID).is_none() {
        tracing::debug!(variable = ENV_ENCRYPTION_KEY_ID, "Key id not in environment, trying file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// Only the key id is required; unset optional variables keep their
/// defaults.
///
/// # Errors
/// Returns `EnverifyError::Configuration` if the key id is missing, a value
/// does not parse, or validation fails.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::with_encryption_key_id(env_var(ENV_ENCRYPTION_KEY_ID)?);

    if let Some(ms) = env_parse(ENV_CRYPTO_TIMEOUT_MS)? {
        config.keys.crypto_timeout_ms = ms;
    }
    if let Some(secs) = env_parse(ENV_SECRET_CACHE_TTL_SECONDS)? {
        config.secrets.cache_ttl_seconds = secs;
    }
    if let Some(attempts) = env_parse(ENV_STARTUP_MAX_ATTEMPTS)? {
        config.startup.max_attempts = attempts;
    }
    if let Some(ms) = env_parse(ENV_STARTUP_RETRY_DELAY_MS)? {
        config.startup.retry_delay_ms = ms;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations for config files.
/// Format is detected by file extension.
///
/// # Errors
/// Returns `EnverifyError::Configuration` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The parsed configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(EnverifyError::Configuration(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            EnverifyError::config("No config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| EnverifyError::Configuration(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`); a missing
/// extension is read as JSON.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| EnverifyError::Configuration(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| EnverifyError::Configuration(format!("Invalid JSON format: {e}"))),
        _ => Err(EnverifyError::Configuration(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        EnverifyError::Configuration(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable; unset yields `None`.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| EnverifyError::Configuration(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}
