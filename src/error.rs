//! Error types shared by the session and profile services.
//!
//! Transport failures pass through [`AuthError::Transport`] untranslated so
//! callers can still inspect the HTTP status and body.

use crate::config::ConfigError;
use crate::storage::StorageError;
use crate::transport::TransportError;

/// Stable machine-readable code for an error, for logs and CLI output.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

/// Errors produced by [`crate::SessionManager`] and [`crate::ProfileStore`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// `sign_in` was called while a session is already active.
    #[error("user is already logged in")]
    AlreadyAuthenticated,

    /// The HTTP transport failed; propagated unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered, but not with the shape we need.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The token store could not be read or written.
    #[error("token storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyAuthenticated => "E_ALREADY_AUTHENTICATED",
            Self::Transport(e) => e.error_code(),
            Self::MalformedResponse(_) => "E_MALFORMED_RESPONSE",
            Self::Storage(e) => e.error_code(),
        }
    }
}

impl ErrorCode for TransportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_TRANSPORT_REQUEST",
            Self::Status { .. } => "E_TRANSPORT_STATUS",
            Self::Encode(_) => "E_TRANSPORT_ENCODE",
            Self::Decode(_) => "E_TRANSPORT_DECODE",
            Self::ClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "E_STORAGE_IO",
            Self::Corrupt(_) => "E_STORAGE_CORRUPT",
        }
    }
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_CONFIG_PARSE",
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
