//! Hosted login redirect
//!
//! Builds the `/authorize` URL for the implicit grant. `state` and `nonce`
//! are fresh random values per call; the provider echoes `state` back in the
//! callback fragment and embeds `nonce` in the ID token.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;
use url::Url;

use crate::error::{Error, Result};
use crate::properties::ClientSettings;

/// Random opaque value for the `state` parameter.
///
/// 32 random bytes, URL-safe base64 without padding (43 characters).
pub fn generate_state() -> String {
    random_token()
}

/// Random opaque value for the `nonce` parameter.
pub fn generate_nonce() -> String {
    random_token()
}

fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Build the full authorization URL with all required parameters.
pub fn build_authorization_url(settings: &ClientSettings, state: &str, nonce: &str) -> Result<Url> {
    let mut url = Url::parse(&settings.authorize_endpoint())
        .map_err(|e| Error::Url(format!("authorize endpoint: {e}")))?;

    url.query_pairs_mut()
        .append_pair("client_id", &settings.client_id)
        .append_pair("response_type", settings.response_type)
        .append_pair("redirect_uri", settings.callback_url.as_str())
        .append_pair("scope", &settings.scope)
        .append_pair("audience", &settings.audience)
        .append_pair("state", state)
        .append_pair("nonce", nonce);

    Ok(url)
}
