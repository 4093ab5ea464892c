//! Auth0 web client glue
//!
//! Builds the identity-provider client the session layer talks to. Nothing
//! here touches storage or keeps state between calls: the session crate owns
//! persistence and subscriber notification.
//!
//! Flow:
//! 1. Caller resolves `AuthProperties` into `ClientSettings` (defaults applied)
//! 2. `Auth0Client::authorize_url()` produces the hosted login redirect
//! 3. The provider redirects back with the tokens in the URL fragment
//! 4. `Auth0Client::parse_hash()` turns that fragment into a `TokenResponse`

pub mod authorize;
pub mod callback;
pub mod client;
pub mod constants;
pub mod error;
pub mod properties;

pub use authorize::{build_authorization_url, generate_nonce, generate_state};
pub use callback::{TokenResponse, decode_id_token_payload, parse_hash};
pub use client::{Auth0Client, WebAuth};
pub use constants::*;
pub use error::{Error, Result};
pub use properties::{AuthProperties, ClientSettings};
