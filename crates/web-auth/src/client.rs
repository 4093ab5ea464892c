//! Identity-provider client seam
//!
//! `WebAuth` is the boundary between the session layer and whatever talks
//! to the identity provider. `Auth0Client` is the bundled implementation;
//! callers can install their own through the session's `configure_with`.

use async_trait::async_trait;
use tracing::info;
use url::Url;

use crate::authorize::{build_authorization_url, generate_nonce, generate_state};
use crate::callback::{self, TokenResponse};
use crate::error::Result;
use crate::properties::ClientSettings;

/// External authentication client.
///
/// Single-threaded by contract: futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait WebAuth {
    /// URL that starts the hosted login flow.
    fn authorize_url(&self) -> Result<Url>;

    /// Turn the callback context (redirect URL or `#fragment`) into tokens.
    async fn parse_hash(&self, callback: &str) -> Result<TokenResponse>;
}

/// Auth0 implicit-grant client built from resolved settings.
#[derive(Debug, Clone)]
pub struct Auth0Client {
    settings: ClientSettings,
}

impl Auth0Client {
    pub fn new(settings: ClientSettings) -> Self {
        info!(
            domain = %settings.domain,
            client_id = %settings.client_id,
            "auth0 client created"
        );
        Self { settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

#[async_trait(?Send)]
impl WebAuth for Auth0Client {
    fn authorize_url(&self) -> Result<Url> {
        build_authorization_url(&self.settings, &generate_state(), &generate_nonce())
    }

    async fn parse_hash(&self, callback: &str) -> Result<TokenResponse> {
        callback::parse_hash(&self.settings, callback)
    }
}
