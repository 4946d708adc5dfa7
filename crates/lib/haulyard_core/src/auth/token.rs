//! Token codec — signed, time-bounded identity assertions.
//!
//! Access and refresh tokens share this codec and differ only in the
//! secret and TTL they are issued with. Verified claims are a distinct
//! type from the wire payload: [`VerifiedClaims`] has no public
//! constructor, so the only way to hold one is to have gone through
//! [`verify`]. Code downstream can therefore never act on claims read
//! out of an unverified token.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;
use crate::models::account::Role;

/// Identity facts embedded in a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub account_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// JWT wire payload. Private to the codec — callers only ever see
/// [`Claims`] going in and [`VerifiedClaims`] coming out.
#[derive(Serialize, Deserialize)]
struct TokenPayload {
    /// Subject — account id.
    sub: String,
    email: String,
    role: Role,
    /// Issued at (unix timestamp).
    iat: i64,
    /// Expiry (unix timestamp).
    exp: i64,
}

/// Claims that have passed signature and expiry verification.
///
/// Constructable only by [`verify`].
#[derive(Debug, Clone)]
pub struct VerifiedClaims {
    account_id: Uuid,
    email: String,
    role: Role,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl VerifiedClaims {
    pub fn account_id(&self) -> Uuid {
        self.account_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// The verified identity facts, detached from the token metadata.
    pub fn into_claims(self) -> Claims {
        Claims {
            account_id: self.account_id,
            email: self.email,
            role: self.role,
        }
    }
}

/// Sign a token embedding `claims`, expiring `ttl` from now (HS256).
pub fn issue(claims: &Claims, secret: &[u8], ttl: Duration) -> Result<String, AuthError> {
    let now = Utc::now();
    let payload = TokenPayload {
        sub: claims.account_id.to_string(),
        email: claims.email.clone(),
        role: claims.role,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &payload,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::InvalidToken(format!("jwt encode: {e}")))
}

/// Verify signature and expiry, returning the embedded claims.
///
/// Expiry is checked with zero leeway: a token is rejected the moment its
/// `exp` passes. Expired tokens surface as [`AuthError::TokenExpired`] so
/// callers can distinguish "refresh" from "re-login"; every other failure
/// is [`AuthError::InvalidToken`].
pub fn verify(token: &str, secret: &[u8]) -> Result<VerifiedClaims, AuthError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;

    let data = decode::<TokenPayload>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken(e.to_string()),
    })?;

    let payload = data.claims;
    let account_id = Uuid::parse_str(&payload.sub)
        .map_err(|_| AuthError::InvalidToken("malformed subject claim".into()))?;
    let issued_at = Utc
        .timestamp_opt(payload.iat, 0)
        .single()
        .ok_or_else(|| AuthError::InvalidToken("malformed iat claim".into()))?;
    let expires_at = Utc
        .timestamp_opt(payload.exp, 0)
        .single()
        .ok_or_else(|| AuthError::InvalidToken("malformed exp claim".into()))?;

    Ok(VerifiedClaims {
        account_id,
        email: payload.email,
        role: payload.role,
        issued_at,
        expires_at,
    })
}
