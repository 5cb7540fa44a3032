//! Session errors

use thiserror::Error;

use crate::codec::CodecError;
use crate::crypto::HmacKeyError;

/// Why a request was not authenticated.
///
/// Callers only ever see a uniform 401; the reason exists for logs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No token cookie on the request
    #[error("token missing")]
    MissingToken,

    /// Signature or structure check failed
    #[error("invalid token")]
    InvalidToken,

    /// Access window closed and refresh window closed too
    #[error("access token expired and refresh token expired")]
    AccessExpiredRefreshExpired,

    /// Access window closed and the refresh authorizer said no
    #[error("access token expired and refresh was denied")]
    AccessExpiredRefreshDenied,
}

impl DenyReason {
    /// Machine-readable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::AccessExpiredRefreshExpired => "ACCESS_EXPIRED_REFRESH_EXPIRED",
            Self::AccessExpiredRefreshDenied => "ACCESS_EXPIRED_REFRESH_DENIED",
        }
    }
}

/// Failures while issuing a session. Not expected in normal operation.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to sign session: {0}")]
    Codec(#[from] CodecError),
}

/// Configuration errors, raised at load time
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid JSON in {var}: {source}")]
    Json {
        var: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid policy: {0}")]
    Policy(String),

    #[error("Invalid session secret: {0}")]
    Key(#[from] HmacKeyError),
}
