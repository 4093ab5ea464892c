//! Session context
//!
//! Owns the configured client, the credential store, and the subscriber
//! registry. Subscribers are notified only after a state-changing event
//! completes: a successful callback (`true`) or a sign-out (`false`).
//! Configuring or querying never notifies.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;
use web_auth::{Auth0Client, AuthProperties, ClientSettings, WebAuth};

use crate::credentials::{self, CredentialBundle, CredentialStore};
use crate::error::{Error, Result};
use crate::store::KeyValueStore;
use crate::subscribers::{AuthObserver, Subscribers, Subscription};

struct Configured {
    settings: ClientSettings,
    client: Rc<dyn WebAuth>,
}

/// Authentication session over a key/value store.
///
/// Single-threaded: uses `Rc`/`RefCell` internally and is neither `Send`
/// nor `Sync`.
pub struct AuthSession<S: KeyValueStore> {
    credentials: CredentialStore<S>,
    configured: RefCell<Option<Configured>>,
    subscribers: Subscribers,
}

impl<S: KeyValueStore> AuthSession<S> {
    /// Create an unconfigured session. `is_authenticated` already reflects
    /// whatever the store holds.
    pub fn new(store: S) -> Self {
        Self {
            credentials: CredentialStore::new(store),
            configured: RefCell::new(None),
            subscribers: Subscribers::new(),
        }
    }

    /// Install an `Auth0Client` built from `properties`.
    ///
    /// Replaces any previously configured client. On error the previous
    /// client and settings stay in place.
    pub fn configure(&self, properties: &AuthProperties) -> Result<()> {
        self.configure_with(properties, |settings| Auth0Client::new(settings.clone()))
    }

    /// Install a client produced by `build` from the resolved settings.
    pub fn configure_with<C, F>(&self, properties: &AuthProperties, build: F) -> Result<()>
    where
        C: WebAuth + 'static,
        F: FnOnce(&ClientSettings) -> C,
    {
        let settings = properties.resolve()?;
        let client: Rc<dyn WebAuth> = Rc::new(build(&settings));

        info!(
            domain = %settings.domain,
            client_id = %settings.client_id,
            scope = %settings.scope,
            "session configured"
        );

        let previous = self
            .configured
            .replace(Some(Configured { settings, client }));
        if previous.is_some() {
            debug!("replaced previous client configuration");
        }
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.configured.borrow().is_some()
    }

    /// Resolved settings of the current client, if configured.
    pub fn settings(&self) -> Option<ClientSettings> {
        self.configured
            .borrow()
            .as_ref()
            .map(|configured| configured.settings.clone())
    }

    fn client(&self) -> Result<Rc<dyn WebAuth>> {
        self.configured
            .borrow()
            .as_ref()
            .map(|configured| Rc::clone(&configured.client))
            .ok_or(Error::NotConfigured)
    }

    /// Whether the stored expiry lies in the future.
    ///
    /// Evaluated against the store on every call. Missing or unparseable
    /// expiry, or a store read failure, counts as signed out.
    pub fn is_authenticated(&self) -> bool {
        match self.credentials.read_expiry() {
            Ok(Some(expires_at)) => {
                credentials::expiry_is_future(&expires_at, credentials::now_millis())
            }
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "could not read expiry, treating as signed out");
                false
            }
        }
    }

    /// URL of the hosted login page. Redirecting there is up to the caller.
    pub fn sign_in(&self) -> Result<Url> {
        let url = self.client()?.authorize_url()?;
        info!(host = url.host_str().unwrap_or_default(), "sign-in started");
        Ok(url)
    }

    /// Complete a login from the callback context (redirect URL or bare
    /// fragment).
    ///
    /// On success the credential bundle is persisted and subscribers are
    /// notified with `true`. On failure nothing is written and nobody is
    /// notified.
    pub async fn handle_auth_callback(&self, callback: &str) -> Result<()> {
        let client = self.client()?;

        let token = match client.parse_hash(callback).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "authentication callback rejected");
                return Err(e.into());
            }
        };

        if token.expires_in == 0 {
            warn!("authentication callback carried an already expired token");
            return Err(web_auth::Error::Callback("expires_in must be positive".into()).into());
        }

        let bundle = CredentialBundle::from_token_response(&token, credentials::now_millis());
        self.credentials.save(&bundle)?;
        info!(expires_in = token.expires_in, "signed in");

        self.subscribers.notify(true);
        Ok(())
    }

    /// Clear the stored credentials and notify subscribers with `false`.
    ///
    /// Clears even when already signed out. Before `configure` the store is
    /// still cleared but nobody is notified.
    pub fn sign_out(&self) -> Result<()> {
        self.credentials.clear()?;

        if !self.is_configured() {
            debug!("signed out before configure, skipping notification");
            return Ok(());
        }

        info!("signed out");
        self.subscribers.notify(false);
        Ok(())
    }

    /// Stored ID token claims, if signed in at some point and not cleared.
    pub fn get_profile(&self) -> Result<Option<Value>> {
        self.credentials.read_profile()
    }

    /// Register a callback for sign-in/sign-out transitions.
    pub fn subscribe(&self, observer: impl Fn(bool) + 'static) -> Subscription {
        self.subscribers.subscribe(observer)
    }

    pub fn subscribe_observer(&self, observer: impl AuthObserver + 'static) -> Subscription {
        self.subscribers.subscribe_observer(observer)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Credential adapter, for direct inspection of stored keys.
    pub fn credentials(&self) -> &CredentialStore<S> {
        &self.credentials
    }
}
