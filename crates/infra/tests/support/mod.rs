//! Shared helpers for `enverify-infra` integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use enverify_common::EncryptionService;
use enverify_core::{EncryptedField, Record};
use enverify_domain::Config;
use enverify_infra::{ConnectivityError, ConnectivityProbe};

pub const KEY_ID: &str = "k1";

/// Default layout with a local key and inline verification-code keys.
pub fn local_config() -> Config {
    let mut config = Config::with_encryption_key_id(KEY_ID);
    config
        .keys
        .local_keys
        .insert(KEY_ID.to_string(), STANDARD.encode(EncryptionService::generate_key()));
    config.secrets.inline.insert(
        "verification_code_database_hmac".to_string(),
        vec![STANDARD.encode(b"code-key-v2"), STANDARD.encode(b"code-key-v1")],
    );
    config
        .secrets
        .inline
        .insert("phone_number_database_hmac".to_string(), vec![STANDARD.encode(b"phone-key")]);
    config
}

/// Probe that fails a fixed number of times before answering.
pub struct FlakyProbe {
    failures: u32,
    retryable: bool,
    pub calls: AtomicU32,
}

impl FlakyProbe {
    pub fn failing(failures: u32) -> Self {
        Self { failures, retryable: true, calls: AtomicU32::new(0) }
    }

    pub fn rejecting() -> Self {
        Self { failures: u32::MAX, retryable: false, calls: AtomicU32::new(0) }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectivityProbe for FlakyProbe {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn check(&self) -> Result<(), ConnectivityError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            return Err(if self.retryable {
                ConnectivityError::unreachable("flaky", format!("refused ({call})"))
            } else {
                ConnectivityError::rejected("flaky", "permission denied")
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmsConfig {
    pub id: i64,
    pub twilio_auth_token: String,
    pub twilio_auth_token_plaintext_cache: String,
    pub twilio_auth_token_ciphertext_cache: String,
    pub twilio_auth_token_ptr: Option<String>,
}

impl Record for SmsConfig {
    fn table(&self) -> &str {
        "sms_configs"
    }

    fn encrypted_field(&mut self, column: &str) -> Option<EncryptedField<'_>> {
        match column {
            "twilio_auth_token" => Some(
                EncryptedField::new(&mut self.twilio_auth_token)
                    .with_cache(
                        &mut self.twilio_auth_token_plaintext_cache,
                        &mut self.twilio_auth_token_ciphertext_cache,
                    )
                    .with_mirror(&mut self.twilio_auth_token_ptr),
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditEntry {
    pub realm_id: String,
    pub action: String,
}

impl Record for AuditEntry {
    fn table(&self) -> &str {
        "audit_entries"
    }

    fn column_text(&self, column: &str) -> Option<String> {
        match column {
            "realm_id" => Some(self.realm_id.clone()),
            "action" => Some(self.action.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationCode {
    pub code: String,
    pub long_code: String,
}

impl Record for VerificationCode {
    fn table(&self) -> &str {
        "verification_codes"
    }

    fn hmac_field(&mut self, column: &str) -> Option<&mut String> {
        match column {
            "code" => Some(&mut self.code),
            "long_code" => Some(&mut self.long_code),
            _ => None,
        }
    }
}
