//! Authentication primitives.
//!
//! Token codec, password hashing, and session token issuance shared by the
//! HTTP layer. Account status policy lives with the request authenticator;
//! nothing in here touches the account store.

pub mod password;
pub mod session;
pub mod token;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token's embedded expiry has elapsed.
    #[error("token expired")]
    TokenExpired,

    /// Bad signature, malformed encoding, or claims of the wrong shape.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// bcrypt failure (bad stored hash, cost out of range).
    #[error("password hash error: {0}")]
    Hash(String),
}
