//! Start-up error types owned by the infrastructure layer.

use enverify_common::error::{CommonError, ErrorClassification};
use enverify_common::resilience::RetryError;
use enverify_domain::EnverifyError;
use thiserror::Error;

/// Failure reported by a connectivity probe.
///
/// The variant is how a probe tells the retry wrapper whether another
/// attempt can help.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConnectivityError {
    /// Not reachable yet; retried.
    #[error("{target} unreachable: {reason}")]
    Unreachable { target: String, reason: String },

    /// Reachable but refused the request; not retried.
    #[error("{target} rejected the check: {reason}")]
    Rejected { target: String, reason: String },
}

impl ConnectivityError {
    pub fn unreachable(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unreachable { target: target.into(), reason: reason.into() }
    }

    pub fn rejected(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected { target: target.into(), reason: reason.into() }
    }

    /// Classify a collaborator error by its own retryability.
    pub fn from_common(target: impl Into<String>, err: &CommonError) -> Self {
        if err.is_retryable() {
            Self::unreachable(target, err.to_string())
        } else {
            Self::rejected(target, err.to_string())
        }
    }
}

impl ErrorClassification for ConnectivityError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

/// Errors from opening the database facade.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("connectivity check {probe} failed: {source}")]
    Connectivity {
        probe: String,
        #[source]
        source: RetryError<ConnectivityError>,
    },

    #[error(transparent)]
    Domain(#[from] EnverifyError),
}

impl StartupError {
    /// Attempts spent on the failing probe, if a probe failed.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Connectivity { source, .. } => Some(source.attempts()),
            Self::Domain(_) => None,
        }
    }
}
