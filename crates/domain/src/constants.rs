//! Application constants
//!
//! Centralized location for table names, cache namespaces and defaults used
//! throughout the field-encryption layer.

// Tables with protected columns
pub const SMS_CONFIGS_TABLE: &str = "sms_configs";
pub const EMAIL_CONFIGS_TABLE: &str = "email_configs";
pub const REALMS_TABLE: &str = "realms";
pub const VERIFICATION_CODES_TABLE: &str = "verification_codes";
pub const AUDIT_ENTRIES_TABLE: &str = "audit_entries";

// Tables with cached lookups
pub const AUTHORIZED_APPS_TABLE: &str = "authorized_apps";
pub const KEY_SERVER_STATS_TABLE: &str = "key_server_stats";
pub const USERS_TABLE: &str = "users";

// Cache namespaces
pub const AUTHORIZED_APPS_BY_ID: &str = "authorized_apps:by_id";
pub const REALMS_BY_ID: &str = "realms:by_id";
pub const REALM_KEY_SERVER_ENABLED: &str = "stats:realm:key_server_enabled";
pub const USERS_BY_ID: &str = "users:by_id";
pub const USERS_BY_EMAIL: &str = "users:by_email";

/// Separator between identifying column values in a composite cache key.
pub const COMPOSITE_KEY_SEPARATOR: &str = "|";

// Companion column naming
pub const PLAINTEXT_CACHE_SUFFIX: &str = "_plaintext_cache";
pub const CIPHERTEXT_CACHE_SUFFIX: &str = "_ciphertext_cache";
pub const MIRROR_SUFFIX: &str = "_ptr";

// Timeouts and retry defaults
pub const DEFAULT_CRYPTO_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_RESOLVE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SECRET_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_STARTUP_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_STARTUP_RETRY_DELAY_MS: u64 = 1_000;

/// Prefix for per-class secret environment variables.
pub const DEFAULT_SECRET_ENV_PREFIX: &str = "ENVERIFY_SECRET_";
