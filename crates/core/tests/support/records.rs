//! Sample entities mirroring the production column layout.

use enverify_core::{EncryptedField, Record};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmsConfig {
    pub id: i64,
    pub twilio_auth_token: String,
    pub twilio_auth_token_plaintext_cache: String,
    pub twilio_auth_token_ciphertext_cache: String,
    pub twilio_auth_token_ptr: Option<String>,
}

impl SmsConfig {
    pub fn new(id: i64, token: &str) -> Self {
        Self { id, twilio_auth_token: token.to_string(), ..Default::default() }
    }
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

    fn column_text(&self, column: &str) -> Option<String> {
        (column == "id").then(|| self.id.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Realm {
    pub id: i64,
    pub name: String,
    pub user_report_webhook_secret: String,
    pub user_report_webhook_secret_plaintext_cache: String,
    pub user_report_webhook_secret_ciphertext_cache: String,
    pub user_report_webhook_secret_ptr: Option<String>,
}

impl Realm {
    pub fn new(id: i64, secret: &str) -> Self {
        Self {
            id,
            name: format!("realm-{id}"),
            user_report_webhook_secret: secret.to_string(),
            ..Default::default()
        }
    }

    /// Forget the memo pair so the next transform reaches the key manager.
    pub fn clear_cache(&mut self) {
        self.user_report_webhook_secret_plaintext_cache.clear();
        self.user_report_webhook_secret_ciphertext_cache.clear();
    }
}

impl Record for Realm {
    fn table(&self) -> &str {
        "realms"
    }

    fn encrypted_field(&mut self, column: &str) -> Option<EncryptedField<'_>> {
        match column {
            "user_report_webhook_secret" => Some(
                EncryptedField::new(&mut self.user_report_webhook_secret)
                    .with_cache(
                        &mut self.user_report_webhook_secret_plaintext_cache,
                        &mut self.user_report_webhook_secret_ciphertext_cache,
                    )
                    .with_mirror(&mut self.user_report_webhook_secret_ptr),
            ),
            _ => None,
        }
    }

    fn column_text(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            _ => None,
        }
    }
}

/// Entity with an encrypted column but no companion columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Webhook {
    pub id: i64,
    pub secret: String,
}

impl Record for Webhook {
    fn table(&self) -> &str {
        "webhooks"
    }

    fn encrypted_field(&mut self, column: &str) -> Option<EncryptedField<'_>> {
        match column {
            "secret" => Some(EncryptedField::new(&mut self.secret)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationCode {
    pub id: i64,
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

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
}

impl Record for User {
    fn table(&self) -> &str {
        "users"
    }

    fn column_text(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.to_string()),
            "email" => Some(self.email.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyServerStats {
    pub realm_id: i64,
}

impl Record for KeyServerStats {
    fn table(&self) -> &str {
        "key_server_stats"
    }

    fn column_text(&self, column: &str) -> Option<String> {
        (column == "realm_id").then(|| self.realm_id.to_string())
    }
}
