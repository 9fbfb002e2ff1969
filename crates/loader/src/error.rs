//! Fetch-boundary error model.

use thiserror::Error;

/// Result type for backing-store fetches.
pub type SourceResult<T> = Result<T, SourceError>;

/// Error surfaced by the backing store.
///
/// The loader does not retry; the caller converts the error into a
/// user-facing notification and offers a manual retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network-level failure reaching the store.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The store rejected the read (rules, credentials).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The store answered but the operation failed on its side.
    #[error("backend error: {0}")]
    Backend(String),

    /// A stored record could not be decoded into its domain type.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl SourceError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}
