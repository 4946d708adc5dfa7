//! Credential verification via bcrypt.
//!
//! A mismatch is a `false` return, not an error — callers decide how a
//! failed comparison surfaces (the login service collapses it into the
//! generic invalid-credentials rejection). bcrypt performs the
//! constant-time comparison internally.

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| AuthError::Hash(format!("bcrypt hash: {e}")))
}

/// Verify a password against a stored bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Hash(format!("bcrypt verify: {e}")))
}
