//! Error type shared by the key manager, secret store and cache adapters.
//!
//! [`CommonError`] is what the collaborator ports return. Whether a failure
//! is worth another attempt is answered by [`ErrorClassification`], which
//! drives the start-up retry loop in [`crate::resilience`].

use thiserror::Error;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Failures reported by external collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// A setting or supplied key is unusable
    #[error("invalid {field}: {message}")]
    Config { field: String, message: String },

    /// Stored text could not be decoded
    #[error("malformed {format}: {message}")]
    Encoding { format: &'static str, message: String },

    /// A remote service failed; `retryable` says whether it may recover
    #[error("{service} failed: {message}")]
    Backend { service: String, message: String, retryable: bool },

    #[error("{resource} '{identifier}' not found")]
    NotFound { resource: String, identifier: String },

    /// Bad key length, authentication tag mismatch and the like
    #[error("{operation} failed: {message}")]
    Crypto { operation: String, message: String },
}

impl CommonError {
    pub fn config_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config { field: field.into(), message: message.into() }
    }

    pub fn backend(service: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        Self::Backend { service: service.into(), message: message.into(), retryable }
    }

    pub fn not_found_with_id(resource: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into(), identifier: identifier.into() }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto { operation: operation.into(), message: message.into() }
    }
}

/// Tells the retry loop whether an error is transient.
pub trait ErrorClassification {
    /// A store that is still starting up is retryable; a rejected credential
    /// is not.
    fn is_retryable(&self) -> bool;
}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend { retryable: true, .. })
    }
}

impl From<base64::DecodeError> for CommonError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Encoding { format: "base64", message: err.to_string() }
    }
}
