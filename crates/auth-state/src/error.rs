//! Error types for session operations

/// Errors from session operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] web_auth::Error),

    #[error("session is not configured: call configure() first")]
    NotConfigured,

    #[error("store error: {0}")]
    Store(String),

    #[error("stored profile is not valid JSON: {0}")]
    ProfileParse(String),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;
