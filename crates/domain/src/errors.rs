//! Error types used throughout the field-encryption layer

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SecretClass;

/// Text shown to end users for every fatal failure of this layer.
pub const USER_FACING_FAILURE: &str = "operation failed";

/// Main error type for Enverify
///
/// Messages carry table, column, key identifier and secret class so
/// operators can diagnose rotation and connectivity problems. They never
/// carry plaintext or key material.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum EnverifyError {
    #[error("secret store could not supply {class}: {reason}")]
    SecretUnavailable { class: SecretClass, reason: String },

    #[error("no keys configured for {class}")]
    NoKeyConfigured { class: SecretClass },

    #[error("failed to encrypt {table}.{column} with key {key_id}: {reason}")]
    EncryptionFailed { table: String, column: String, key_id: String, reason: String },

    #[error("failed to decrypt {table}.{column} with key {key_id}: {reason}")]
    DecryptionFailed { table: String, column: String, key_id: String, reason: String },

    #[error("failed to sign value: {reason}")]
    SigningFailed { reason: String },

    #[error("record in {table} has no column {column}")]
    MissingColumn { table: String, column: String },

    #[error("{table}.{column} holds an unusable value: {reason}")]
    InvalidValue { table: String, column: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("cache operation on {namespace}/{key} failed: {reason}")]
    Cache { namespace: String, key: String, reason: String },

    #[error("{operation} timed out after {duration:?}")]
    Timeout { operation: String, duration: Duration },
}

impl EnverifyError {
    /// Stable snake_case label for metrics and structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SecretUnavailable { .. } => "secret_unavailable",
            Self::NoKeyConfigured { .. } => "no_key_configured",
            Self::EncryptionFailed { .. } => "encryption_failed",
            Self::DecryptionFailed { .. } => "decryption_failed",
            Self::SigningFailed { .. } => "signing_failed",
            Self::MissingColumn { .. } => "missing_column",
            Self::InvalidValue { .. } => "invalid_value",
            Self::Configuration(_) => "configuration",
            Self::Cache { .. } => "cache",
            Self::Timeout { .. } => "timeout",
        }
    }

    /// The generic message surfaced to end users; the cause stays in logs.
    pub fn user_message(&self) -> &'static str {
        USER_FACING_FAILURE
    }

    /// Whether this failure must abort the enclosing record operation.
    ///
    /// Only cache failures are best-effort.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Cache { .. })
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn { table: table.into(), column: column.into() }
    }
}

/// Result type alias for Enverify operations
pub type Result<T> = std::result::Result<T, EnverifyError>;
