//! Client properties and their resolved form
//!
//! `AuthProperties` is what the caller hands to `configure`: only `domain`
//! and `client_id` are required. `ClientSettings` is the validated result
//! with every default filled in, and is what the client is built from.

use serde::Deserialize;
use url::Url;

use crate::constants::{DEFAULT_CALLBACK_URL, DEFAULT_SCOPE, RESPONSE_TYPE};
use crate::error::{Error, Result};

/// Caller-supplied client properties.
///
/// Field names also accept the camelCase spelling used by the browser SDK
/// (`clientID`, `callbackUrl`) so existing config files load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthProperties {
    /// Tenant domain, e.g. `bk-samples.auth0.com`
    #[serde(default)]
    pub domain: String,
    #[serde(default, alias = "clientID", alias = "clientId")]
    pub client_id: String,
    #[serde(default, alias = "callbackUrl")]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
}

impl AuthProperties {
    pub fn new(domain: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            client_id: client_id.into(),
            ..Self::default()
        }
    }

    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Validate required fields and apply defaults.
    ///
    /// `domain` and `client_id` must be non-blank. A scheme prefix or trailing
    /// slash on `domain` is stripped; any other path is rejected. Blank optional fields count as absent.
    pub fn resolve(&self) -> Result<ClientSettings> {
        let domain = self
            .domain
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        if domain.is_empty() {
            return Err(Error::Configuration("domain is required".into()));
        }
        if domain.contains('/') {
            return Err(Error::Configuration(format!(
                "domain must be a bare host, got {domain:?}"
            )));
        }

        let client_id = self.client_id.trim();
        if client_id.is_empty() {
            return Err(Error::Configuration("client_id is required".into()));
        }

        let issuer = Url::parse(&format!("https://{domain}/"))
            .map_err(|e| Error::Configuration(format!("invalid domain {domain:?}: {e}")))?;

        let callback_url = non_blank(&self.callback_url).unwrap_or(DEFAULT_CALLBACK_URL);
        let callback_url = Url::parse(callback_url).map_err(|e| {
            Error::Configuration(format!("invalid callback_url {callback_url:?}: {e}"))
        })?;

        let scope = non_blank(&self.scope).unwrap_or(DEFAULT_SCOPE).to_owned();
        let audience = match non_blank(&self.audience) {
            Some(audience) => audience.to_owned(),
            None => format!("{issuer}userinfo"),
        };

        Ok(ClientSettings {
            domain: domain.to_owned(),
            client_id: client_id.to_owned(),
            callback_url,
            scope,
            audience,
            response_type: RESPONSE_TYPE,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Fully resolved client settings. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub domain: String,
    pub client_id: String,
    pub callback_url: Url,
    pub scope: String,
    pub audience: String,
    pub response_type: &'static str,
}

impl ClientSettings {
    /// Expected `iss` claim of tokens minted for this tenant.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    /// Hosted login endpoint.
    pub fn authorize_endpoint(&self) -> String {
        format!("https://{}/authorize", self.domain)
    }
}
