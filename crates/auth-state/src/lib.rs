//! Persisted authentication state with change notification
//!
//! `AuthSession` is the context object callers hold. It owns the configured
//! identity-provider client, the credential store, and the subscriber
//! registry. Session lifecycle:
//! 1. `AuthSession::new(store)`: `is_authenticated()` works immediately
//! 2. `configure(properties)`: installs the client (replaces on reconfigure)
//! 3. `sign_in()`: hosted login URL for the caller to redirect to
//! 4. `handle_auth_callback(url)`: persists the four credential keys,
//!    notifies subscribers with `true`
//! 5. `sign_out()`: clears the four keys, notifies subscribers with `false`

pub mod credentials;
pub mod error;
pub mod session;
pub mod store;
pub mod subscribers;

pub use credentials::{CredentialBundle, CredentialStore};
pub use error::{Error, Result};
pub use session::AuthSession;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use subscribers::{AuthObserver, Subscribers, Subscription};
pub use web_auth::{ACCESS_TOKEN, AuthProperties, EXPIRES_AT, ID_TOKEN, PROFILE};
