//! Callback fragment parsing
//!
//! After login the provider redirects to the callback URL with the result in
//! the fragment, either the tokens:
//!
//! `#access_token=..&id_token=..&token_type=Bearer&expires_in=7200&state=..`
//!
//! or an error:
//!
//! `#error=access_denied&error_description=..&state=..`
//!
//! The ID token payload is decoded and its `iss`/`aud` claims are checked
//! against the client settings. Signatures are not verified here.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use common::Secret;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::properties::ClientSettings;

/// Token response parsed out of a successful callback.
///
/// `expires_in` is a delta in seconds from the redirect. The session layer
/// converts it to an absolute epoch-millisecond expiry when persisting.
#[derive(Debug, Clone)]
pub struct TokenResponse {
    pub access_token: Secret<String>,
    pub id_token: Secret<String>,
    pub token_type: Option<String>,
    pub expires_in: u64,
    pub state: Option<String>,
    /// Decoded ID token claims; persisted as the user profile
    pub id_token_payload: Value,
}

/// Parse a callback URL (or bare `#fragment`) into a token response.
pub fn parse_hash(settings: &ClientSettings, callback: &str) -> Result<TokenResponse> {
    let fragment = extract_fragment(callback);
    if fragment.is_empty() {
        return Err(Error::Callback("no authentication data in callback".into()));
    }

    let mut params: HashMap<String, String> = url::form_urlencoded::parse(fragment.as_bytes())
        .into_owned()
        .collect();

    if let Some(error) = params.remove("error") {
        let description = params.remove("error_description").unwrap_or_default();
        return Err(Error::Provider { error, description });
    }

    let access_token = required(&mut params, "access_token")?;
    let id_token = required(&mut params, "id_token")?;
    let expires_in = required(&mut params, "expires_in")?;
    let expires_in: u64 = expires_in
        .parse()
        .map_err(|e| Error::Callback(format!("expires_in is not a number: {e}")))?;
    if expires_in == 0 {
        return Err(Error::Callback("expires_in must be positive".into()));
    }

    let id_token_payload = decode_id_token_payload(&id_token)?;
    check_claims(settings, &id_token_payload)?;

    debug!(expires_in, "parsed authentication callback");

    Ok(TokenResponse {
        access_token: Secret::new(access_token),
        id_token: Secret::new(id_token),
        token_type: params.remove("token_type"),
        expires_in,
        state: params.remove("state"),
        id_token_payload,
    })
}

/// Pull the fragment out of a full URL, or strip the leading `#` from a bare
/// fragment.
fn extract_fragment(callback: &str) -> String {
    let callback = callback.trim();
    match Url::parse(callback) {
        Ok(url) => url.fragment().unwrap_or_default().to_owned(),
        Err(_) => callback.trim_start_matches('#').to_owned(),
    }
}

fn required(params: &mut HashMap<String, String>, name: &str) -> Result<String> {
    params
        .remove(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Callback(format!("callback is missing {name}")))
}

/// Decode the payload segment of a JWT without verifying its signature.
pub fn decode_id_token_payload(id_token: &str) -> Result<Value> {
    let segments: Vec<&str> = id_token.split('.').collect();
    if segments.len() != 3 {
        return Err(Error::InvalidIdToken(format!(
            "expected 3 segments, got {}",
            segments.len()
        )));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|e| Error::InvalidIdToken(format!("payload is not base64url: {e}")))?;

    let payload: Value = serde_json::from_slice(&bytes)
        .map_err(|e| Error::InvalidIdToken(format!("payload is not JSON: {e}")))?;

    if !payload.is_object() {
        return Err(Error::InvalidIdToken("payload is not a JSON object".into()));
    }
    Ok(payload)
}

fn check_claims(settings: &ClientSettings, payload: &Value) -> Result<()> {
    if let Some(iss) = payload.get("iss") {
        let expected = settings.issuer();
        if iss.as_str() != Some(expected.as_str()) {
            return Err(Error::InvalidIdToken(format!(
                "issuer {iss} does not match {expected}"
            )));
        }
    }

    if let Some(aud) = payload.get("aud") {
        let matches = match aud {
            Value::String(aud) => *aud == settings.client_id,
            Value::Array(auds) => auds
                .iter()
                .any(|a| a.as_str() == Some(settings.client_id.as_str())),
            _ => false,
        };
        if !matches {
            return Err(Error::InvalidIdToken(format!(
                "audience {aud} does not include client {}",
                settings.client_id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::AuthProperties;

    fn settings() -> ClientSettings {
        AuthProperties::new("bk-samples.auth0.com", "someClientID")
            .resolve()
            .unwrap()
    }

    fn jwt(payload: &Value) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload.to_string())
        )
    }

    fn claims() -> Value {
        serde_json::json!({
            "iss": "https://bk-samples.auth0.com/",
            "aud": "someClientID",
            "sub": "auth0|123",
            "name": "Bruno",
        })
    }

    #[test]
    fn parses_full_callback_url() {
        let callback = format!(
            "http://localhost:3000/callback#access_token=at_abc&id_token={}&token_type=Bearer&expires_in=7200&state=xyz",
            jwt(&claims())
        );
        let token = parse_hash(&settings(), &callback).unwrap();

        assert_eq!(token.access_token.expose(), "at_abc");
        assert_eq!(token.expires_in, 7200);
        assert_eq!(token.token_type.as_deref(), Some("Bearer"));
        assert_eq!(token.state.as_deref(), Some("xyz"));
        assert_eq!(token.id_token_payload["name"], "Bruno");
    }

    #[test]
    fn parses_bare_fragment() {
        let callback = format!(
            "#access_token=at_abc&id_token={}&expires_in=60",
            jwt(&claims())
        );
        let token = parse_hash(&settings(), &callback).unwrap();
        assert_eq!(token.expires_in, 60);
        assert!(token.state.is_none());
    }

    #[test]
    fn empty_callback_is_rejected() {
        let err = parse_hash(&settings(), "http://localhost:3000/callback").unwrap_err();
        assert!(matches!(err, Error::Callback(_)), "got: {err:?}");
    }

    #[test]
    fn provider_error_is_surfaced() {
        let err = parse_hash(
            &settings(),
            "#error=access_denied&error_description=User%20cancelled",
        )
        .unwrap_err();
        match err {
            Error::Provider { error, description } => {
                assert_eq!(error, "access_denied");
                assert_eq!(description, "User cancelled");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn missing_expires_in_is_rejected() {
        let callback = format!("#access_token=at&id_token={}", jwt(&claims()));
        let err = parse_hash(&settings(), &callback).unwrap_err();
        assert!(err.to_string().contains("expires_in"), "got: {err}");
    }

    #[test]
    fn non_numeric_expires_in_is_rejected() {
        let callback = format!(
            "#access_token=at&id_token={}&expires_in=soon",
            jwt(&claims())
        );
        assert!(parse_hash(&settings(), &callback).is_err());
    }

    #[test]
    fn zero_expires_in_is_rejected() {
        let callback = format!(
            "#access_token=at&id_token={}&expires_in=0",
            jwt(&claims())
        );
        let err = parse_hash(&settings(), &callback).unwrap_err();
        assert!(matches!(err, Error::Callback(_)), "got: {err:?}");
        assert!(err.to_string().contains("expires_in"), "got: {err}");
    }

    #[test]
    fn malformed_id_token_is_rejected() {
        let err = parse_hash(
            &settings(),
            "#access_token=at&id_token=not-a-jwt&expires_in=60",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidIdToken(_)), "got: {err:?}");
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let mut payload = claims();
        payload["iss"] = "https://evil.example.com/".into();
        let callback = format!("#access_token=at&id_token={}&expires_in=60", jwt(&payload));
        let err = parse_hash(&settings(), &callback).unwrap_err();
        assert!(err.to_string().contains("issuer"), "got: {err}");
    }

    #[test]
    fn audience_array_must_include_client() {
        let mut payload = claims();
        payload["aud"] = serde_json::json!(["other", "someClientID"]);
        let callback = format!("#access_token=at&id_token={}&expires_in=60", jwt(&payload));
        assert!(parse_hash(&settings(), &callback).is_ok());

        payload["aud"] = serde_json::json!(["other"]);
        let callback = format!("#access_token=at&id_token={}&expires_in=60", jwt(&payload));
        assert!(parse_hash(&settings(), &callback).is_err());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode("[1,2]"));
        assert!(decode_id_token_payload(&token).is_err());
    }
}
