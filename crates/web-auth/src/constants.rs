//! Storage keys and client defaults
//!
//! The four storage keys are part of the public surface: callers that need
//! to inspect the persisted session directly read them from the same store.

/// Storage key holding the raw access token
pub const ACCESS_TOKEN: &str = "access_token";

/// Storage key holding the raw ID token (JWT)
pub const ID_TOKEN: &str = "id_token";

/// Storage key holding the ID token payload as JSON text
pub const PROFILE: &str = "profile";

/// Storage key holding the expiry as epoch milliseconds, serialized as text
pub const EXPIRES_AT: &str = "expires_at";

/// All credential keys, in write order.
pub const CREDENTIAL_KEYS: [&str; 4] = [ACCESS_TOKEN, ID_TOKEN, PROFILE, EXPIRES_AT];

/// Redirect target used when the caller does not supply one
pub const DEFAULT_CALLBACK_URL: &str = "http://localhost:3000/callback";

/// Scope requested when the caller does not supply one
pub const DEFAULT_SCOPE: &str = "openid profile";

/// Implicit grant: both tokens come back in the redirect fragment
pub const RESPONSE_TYPE: &str = "token id_token";
