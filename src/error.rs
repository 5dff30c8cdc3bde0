//! Error types for relay admission control

use crate::store::StoreError;
use thiserror::Error;

/// Admission-control result type
pub type Result<T> = std::result::Result<T, WardenError>;

/// Admission-control errors
#[derive(Error, Debug)]
pub enum WardenError {
    /// Required construction dependency missing; fatal at startup
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed admin command payload or subject key
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid signature or issuer is not an administrator
    #[error("authorization error: {0}")]
    Auth(String),

    /// Persistent store I/O failure, carrying the attempted operation and
    /// subject for diagnostics
    #[error("store operation '{operation}' failed for {subject}: {source}")]
    Store {
        operation: &'static str,
        subject: String,
        source: StoreError,
    },
}

impl WardenError {
    /// Wrap a store failure with operation and subject context
    pub(crate) fn store(
        operation: &'static str,
        subject: impl Into<String>,
        source: StoreError,
    ) -> Self {
        WardenError::Store {
            operation,
            subject: subject.into(),
            source,
        }
    }
}
