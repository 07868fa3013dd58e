//! Configuration structures
//!
//! All descriptors are read once at process start and never change
//! afterwards. `Config::default()` reproduces the production column layout;
//! only `keys.encryption_key_id` has to be supplied.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AUTHORIZED_APPS_BY_ID, AUTHORIZED_APPS_TABLE, DEFAULT_CRYPTO_TIMEOUT_MS,
    DEFAULT_RESOLVE_TIMEOUT_MS, DEFAULT_SECRET_CACHE_TTL_SECS, DEFAULT_SECRET_ENV_PREFIX,
    DEFAULT_STARTUP_MAX_ATTEMPTS, DEFAULT_STARTUP_RETRY_DELAY_MS, EMAIL_CONFIGS_TABLE,
    KEY_SERVER_STATS_TABLE, REALMS_BY_ID, REALMS_TABLE, REALM_KEY_SERVER_ENABLED,
    SMS_CONFIGS_TABLE, USERS_BY_EMAIL, USERS_BY_ID, USERS_TABLE, VERIFICATION_CODES_TABLE,
};
use crate::errors::{EnverifyError, Result};
use crate::types::{CacheInvalidationRule, EncryptedFieldSpec, HmacFieldSpec, SecretClass};

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keys: KeysConfig,
    pub secrets: SecretsConfig,
    pub startup: StartupConfig,
    pub encrypted_fields: Vec<EncryptedFieldSpec>,
    pub hmac_fields: Vec<HmacFieldSpec>,
    pub cache_invalidation: Vec<CacheInvalidationRule>,
}

/// Key manager settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Key identifier used for every encrypted column without its own
    pub encryption_key_id: String,
    /// Deadline for each key manager call
    pub crypto_timeout_ms: u64,
    /// Key id to base64 AES-256 key, for the local key manager
    pub local_keys: BTreeMap<String, String>,
}

/// Secret resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    pub cache_ttl_seconds: u64,
    pub resolve_timeout_ms: u64,
    /// Secret class tag to base64 keys, newest first
    pub inline: BTreeMap<String, Vec<String>>,
    pub env_prefix: String,
}

/// Start-up connectivity retry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keys: KeysConfig::default(),
            secrets: SecretsConfig::default(),
            startup: StartupConfig::default(),
            encrypted_fields: default_encrypted_fields(),
            hmac_fields: default_hmac_fields(),
            cache_invalidation: default_cache_invalidation(),
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            encryption_key_id: String::new(),
            crypto_timeout_ms: DEFAULT_CRYPTO_TIMEOUT_MS,
            local_keys: BTreeMap::new(),
        }
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: DEFAULT_SECRET_CACHE_TTL_SECS,
            resolve_timeout_ms: DEFAULT_RESOLVE_TIMEOUT_MS,
            inline: BTreeMap::new(),
            env_prefix: DEFAULT_SECRET_ENV_PREFIX.to_string(),
        }
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_STARTUP_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_STARTUP_RETRY_DELAY_MS,
        }
    }
}

impl KeysConfig {
    pub fn crypto_timeout(&self) -> Duration {
        Duration::from_millis(self.crypto_timeout_ms)
    }
}

impl SecretsConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    /// Inline keys keyed by parsed secret class.
    ///
    /// # Errors
    /// `Configuration` when a map key is not a known secret class.
    pub fn inline_by_class(&self) -> Result<BTreeMap<SecretClass, Vec<String>>> {
        self.inline
            .iter()
            .map(|(tag, keys)| {
                tag.parse::<SecretClass>()
                    .map(|class| (class, keys.clone()))
                    .map_err(|e| EnverifyError::Configuration(format!("secrets.inline: {e}")))
            })
            .collect()
    }
}

impl StartupConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Config {
    /// Default configuration with the given key identifier.
    pub fn with_encryption_key_id(key_id: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.keys.encryption_key_id = key_id.into();
        config
    }

    /// Reject configurations that would silently skip a security control.
    ///
    /// # Errors
    /// `EnverifyError::Configuration` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.keys.crypto_timeout_ms == 0 {
            return Err(EnverifyError::config("keys.crypto_timeout_ms must be greater than 0"));
        }
        if self.secrets.resolve_timeout_ms == 0 {
            return Err(EnverifyError::config("secrets.resolve_timeout_ms must be greater than 0"));
        }
        if self.startup.max_attempts == 0 {
            return Err(EnverifyError::config("startup.max_attempts must be greater than 0"));
        }
        self.secrets.inline_by_class()?;

        let mut protected = HashSet::new();
        for spec in &self.encrypted_fields {
            require_name("encrypted_fields", "table", &spec.table)?;
            require_name("encrypted_fields", "column", &spec.column)?;
            spec.cache_columns()?;
            if spec.effective_key_id(&self.keys.encryption_key_id).trim().is_empty() {
                return Err(EnverifyError::Configuration(format!(
                    "{}.{} has no key id and keys.encryption_key_id is empty",
                    spec.table, spec.column
                )));
            }
            if !protected.insert((spec.table.as_str(), spec.column.as_str())) {
                return Err(duplicate("encrypted_fields", &spec.table, &spec.column));
            }
        }

        for spec in &self.hmac_fields {
            require_name("hmac_fields", "table", &spec.table)?;
            require_name("hmac_fields", "column", &spec.column)?;
            if !protected.insert((spec.table.as_str(), spec.column.as_str())) {
                return Err(duplicate("hmac_fields", &spec.table, &spec.column));
            }
        }

        let mut rules = HashSet::new();
        for rule in &self.cache_invalidation {
            require_name("cache_invalidation", "namespace", &rule.namespace)?;
            require_name("cache_invalidation", "table", &rule.table)?;
            if rule.columns.is_empty() {
                return Err(EnverifyError::Configuration(format!(
                    "cache_invalidation rule {} on {} lists no columns",
                    rule.namespace, rule.table
                )));
            }
            if let Some(column) = rule.columns.iter().find(|c| c.trim().is_empty()) {
                return Err(EnverifyError::Configuration(format!(
                    "cache_invalidation rule {} has a blank column name {column:?}",
                    rule.namespace
                )));
            }
            if !rules.insert((rule.namespace.as_str(), rule.table.as_str())) {
                return Err(duplicate("cache_invalidation", &rule.namespace, &rule.table));
            }
        }

        Ok(())
    }
}

fn require_name(section: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EnverifyError::Configuration(format!("{section}: {field} must not be empty")));
    }
    Ok(())
}

fn duplicate(section: &str, a: &str, b: &str) -> EnverifyError {
    EnverifyError::Configuration(format!("{section}: duplicate entry for {a}/{b}"))
}

fn default_encrypted_fields() -> Vec<EncryptedFieldSpec> {
    vec![
        EncryptedFieldSpec::with_default_companions(SMS_CONFIGS_TABLE, "twilio_auth_token"),
        EncryptedFieldSpec::with_default_companions(EMAIL_CONFIGS_TABLE, "smtp_password"),
        EncryptedFieldSpec::with_default_companions(REALMS_TABLE, "user_report_webhook_secret"),
    ]
}

fn default_hmac_fields() -> Vec<HmacFieldSpec> {
    vec![
        HmacFieldSpec::new(
            VERIFICATION_CODES_TABLE,
            "code",
            SecretClass::VerificationCodeDatabaseHmac,
        ),
        HmacFieldSpec::new(
            VERIFICATION_CODES_TABLE,
            "long_code",
            SecretClass::VerificationCodeDatabaseHmac,
        ),
    ]
}

fn default_cache_invalidation() -> Vec<CacheInvalidationRule> {
    vec![
        CacheInvalidationRule::new(AUTHORIZED_APPS_BY_ID, AUTHORIZED_APPS_TABLE, ["id"]),
        CacheInvalidationRule::new(REALMS_BY_ID, REALMS_TABLE, ["id"]),
        CacheInvalidationRule::new(REALM_KEY_SERVER_ENABLED, KEY_SERVER_STATS_TABLE, ["realm_id"]),
        CacheInvalidationRule::new(USERS_BY_ID, USERS_TABLE, ["id"]),
        CacheInvalidationRule::new(USERS_BY_EMAIL, USERS_TABLE, ["email"]),
    ]
}
