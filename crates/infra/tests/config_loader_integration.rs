//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use enverify_domain::{EnverifyError, SecretClass};
use enverify_infra::config;
use tempfile::Builder;

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "keys": {
            "encryption_key_id": "projects/p/locations/global/keyRings/r/cryptoKeys/db",
            "crypto_timeout_ms": 3000
        },
        "secrets": {
            "inline": { "cookie_keys": ["Y29va2ll"] }
        },
        "encrypted_fields": [
            { "table": "sms_configs", "column": "twilio_auth_token" }
        ],
        "hmac_fields": [],
        "cache_invalidation": [
            { "namespace": "realms:by_id", "table": "realms", "columns": ["id"] }
        ]
    }"#;

    let mut temp_file = Builder::new().suffix(".json").tempfile().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let config = config::load_from_file(Some(temp_file.path().to_path_buf()))
        .expect("Failed to load config from JSON file");

    assert_eq!(
        config.keys.encryption_key_id,
        "projects/p/locations/global/keyRings/r/cryptoKeys/db"
    );
    assert_eq!(config.keys.crypto_timeout_ms, 3000);
    assert_eq!(config.encrypted_fields.len(), 1);
    assert!(config.encrypted_fields[0].plaintext_cache_column.is_none());
    assert!(config.hmac_fields.is_empty());
    assert_eq!(config.cache_invalidation.len(), 1);
    assert_eq!(config.startup.max_attempts, 30);

    let inline = config.secrets.inline_by_class().expect("inline classes parse");
    assert!(inline.contains_key(&SecretClass::CookieKeys));
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[keys]
encryption_key_id = "k1"

[keys.local_keys]
k1 = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="

[startup]
max_attempts = 10
retry_delay_ms = 500

[[encrypted_fields]]
table = "email_configs"
column = "smtp_password"
plaintext_cache_column = "smtp_password_plaintext_cache"
ciphertext_cache_column = "smtp_password_ciphertext_cache"
mirror_column = "smtp_password_ptr"
"#;

    let mut temp_file = Builder::new().suffix(".toml").tempfile().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let config = config::load_from_file(Some(temp_file.path().to_path_buf()))
        .expect("Failed to load config from TOML file");

    assert_eq!(config.startup.max_attempts, 10);
    assert_eq!(config.startup.retry_delay_ms, 500);
    assert_eq!(config.keys.local_keys.len(), 1);
    assert_eq!(config.encrypted_fields.len(), 1);
    assert_eq!(
        config.encrypted_fields[0].cache_columns().expect("cache columns"),
        Some(("smtp_password_plaintext_cache", "smtp_password_ciphertext_cache"))
    );
    // Sections not present keep their defaults.
    assert_eq!(config.hmac_fields.len(), 2);
}

#[test]
fn test_partial_cache_columns_are_fatal() {
    let json_content = r#"{
        "keys": { "encryption_key_id": "k1" },
        "encrypted_fields": [
            {
                "table": "sms_configs",
                "column": "twilio_auth_token",
                "plaintext_cache_column": "twilio_auth_token_plaintext_cache"
            }
        ]
    }"#;

    let mut temp_file = Builder::new().suffix(".json").tempfile().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let err = config::load_from_file(Some(temp_file.path().to_path_buf())).unwrap_err();
    assert!(matches!(err, EnverifyError::Configuration(_)));
}

#[test]
fn test_invalid_json_reports_format() {
    let mut temp_file = Builder::new().suffix(".json").tempfile().expect("Failed to create temp file");
    temp_file.write_all(b"{ not json").expect("Failed to write to temp file");

    let err = config::load_from_file(Some(temp_file.path().to_path_buf())).unwrap_err();
    assert!(err.to_string().contains("Invalid JSON format"));
}
