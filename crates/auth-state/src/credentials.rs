//! Credential Store Adapter
//!
//! Reads and writes the four credential keys in a `KeyValueStore`. The keys
//! are always written and cleared as a group, but the store has no
//! transactions: a failure mid-way leaves a partial bundle, which reads as
//! signed out because the expiry is written last.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::debug;
use web_auth::{ACCESS_TOKEN, CREDENTIAL_KEYS, EXPIRES_AT, ID_TOKEN, PROFILE, TokenResponse};

use crate::error::{Error, Result};
use crate::store::KeyValueStore;

/// The four persisted fields of a signed-in session.
///
/// `expires_at` is epoch milliseconds serialized as text, computed at
/// storage time from the token response's `expires_in` delta.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialBundle {
    pub access_token: String,
    pub id_token: String,
    pub profile: Value,
    pub expires_at: String,
}

impl CredentialBundle {
    /// Build a bundle from a token response received at `now_millis`.
    pub fn from_token_response(token: &TokenResponse, now_millis: u64) -> Self {
        let expires_at = now_millis.saturating_add(token.expires_in.saturating_mul(1000));
        Self {
            access_token: token.access_token.expose_owned(),
            id_token: token.id_token.expose_owned(),
            profile: token.id_token_payload.clone(),
            expires_at: expires_at.to_string(),
        }
    }
}

/// Typed view of the credential keys over any `KeyValueStore`.
#[derive(Debug)]
pub struct CredentialStore<S> {
    store: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store, for direct key inspection.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write all four keys. Expiry goes last.
    pub fn save(&self, bundle: &CredentialBundle) -> Result<()> {
        let profile = serde_json::to_string(&bundle.profile)
            .map_err(|e| Error::Store(format!("serializing profile: {e}")))?;

        self.store.set_item(ACCESS_TOKEN, &bundle.access_token)?;
        self.store.set_item(ID_TOKEN, &bundle.id_token)?;
        self.store.set_item(PROFILE, &profile)?;
        self.store.set_item(EXPIRES_AT, &bundle.expires_at)?;
        debug!(expires_at = %bundle.expires_at, "saved credentials");
        Ok(())
    }

    /// Remove exactly the four credential keys. Expiry goes first.
    pub fn clear(&self) -> Result<()> {
        for key in CREDENTIAL_KEYS.iter().rev() {
            self.store.remove_item(key)?;
        }
        debug!("cleared credentials");
        Ok(())
    }

    pub fn read_expiry(&self) -> Result<Option<String>> {
        self.store.get_item(EXPIRES_AT)
    }

    pub fn read_access_token(&self) -> Result<Option<String>> {
        self.store.get_item(ACCESS_TOKEN)
    }

    pub fn read_id_token(&self) -> Result<Option<String>> {
        self.store.get_item(ID_TOKEN)
    }

    pub fn read_profile(&self) -> Result<Option<Value>> {
        match self.store.get_item(PROFILE)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| Error::ProfileParse(e.to_string())),
            None => Ok(None),
        }
    }
}

/// Current time as unix epoch milliseconds.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Whether a stored expiry lies strictly after `now_millis`.
///
/// Unparseable values count as expired.
pub(crate) fn expiry_is_future(expires_at: &str, now_millis: u64) -> bool {
    match expires_at.trim().parse::<u64>() {
        Ok(expires_at) => expires_at > now_millis,
        Err(_) => false,
    }
}
