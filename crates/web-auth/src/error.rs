//! Error types for identity-provider client operations

/// Errors from configuring the client or parsing a callback.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("authentication callback failed: {0}")]
    Callback(String),

    #[error("identity provider returned {error}: {description}")]
    Provider { error: String, description: String },

    #[error("invalid id token: {0}")]
    InvalidIdToken(String),

    #[error("invalid URL: {0}")]
    Url(String),
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
