//! Shared types for the auth-session workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
