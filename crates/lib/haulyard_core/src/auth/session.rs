//! Session bootstrap — access/refresh token pair issuance.
//!
//! Access and refresh tokens carry the same claims but are signed with
//! independent secrets and TTLs, so neither kind is ever accepted where
//! the other is expected. Refresh is stateless: it verifies against the
//! refresh secret and re-issues only a fresh access token. Nothing here
//! persists anything — account status is re-checked on every
//! authenticated request, which is what bounds a disabled account's
//! remaining access.

use chrono::Duration;

use super::AuthError;
use super::token::{self, Claims};
use crate::models::account::Account;

/// Process-wide token signing configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub access_secret: Vec<u8>,
    pub access_ttl: Duration,
    pub refresh_secret: Vec<u8>,
    pub refresh_ttl: Duration,
}

impl SessionConfig {
    pub fn new(
        access_secret: impl Into<Vec<u8>>,
        access_ttl_secs: i64,
        refresh_secret: impl Into<Vec<u8>>,
        refresh_ttl_secs: i64,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_secret: refresh_secret.into(),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        }
    }
}

/// A freshly minted access + refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn claims_for(account: &Account) -> Claims {
    Claims {
        account_id: account.id,
        email: account.email.clone(),
        role: account.role,
    }
}

/// Mint the access + refresh pair for a freshly authenticated account.
pub fn issue_session_tokens(
    account: &Account,
    config: &SessionConfig,
) -> Result<TokenPair, AuthError> {
    let claims = claims_for(account);
    let access_token = token::issue(&claims, &config.access_secret, config.access_ttl)?;
    let refresh_token = token::issue(&claims, &config.refresh_secret, config.refresh_ttl)?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Exchange a refresh token for a fresh access token carrying the same
/// claims. Token failures propagate typed for the HTTP layer to map.
pub fn refresh_access_token(
    refresh_token: &str,
    config: &SessionConfig,
) -> Result<String, AuthError> {
    let verified = token::verify(refresh_token, &config.refresh_secret)?;
    token::issue(
        &verified.into_claims(),
        &config.access_secret,
        config.access_ttl,
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::account::{ActiveStatus, Role};

    fn config() -> SessionConfig {
        SessionConfig::new("access-secret", 900, "refresh-secret", 60 * 60 * 24 * 30)
    }

    fn account() -> Account {
        let now = Utc::now();
        Account {
            id: Uuid::new_v4(),
            name: "Ada Driver".into(),
            email: "a@x.com".into(),
            password_hash: None,
            phone: None,
            address: None,
            picture: None,
            role: Role::Driver,
            active_status: ActiveStatus::Active,
            is_deleted: false,
            is_verified: true,
            auth_providers: vec![],
            push_tokens: vec![],
            receive_notifications: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn each_token_verifies_only_with_its_own_secret() {
        let config = config();
        let account = account();
        let pair = issue_session_tokens(&account, &config).unwrap();

        let access = token::verify(&pair.access_token, &config.access_secret).unwrap();
        assert_eq!(access.account_id(), account.id);
        assert_eq!(access.role(), account.role);

        let refresh = token::verify(&pair.refresh_token, &config.refresh_secret).unwrap();
        assert_eq!(refresh.account_id(), account.id);

        // Secret isolation: a refresh token is not an access token and
        // vice versa.
        assert!(matches!(
            token::verify(&pair.access_token, &config.refresh_secret),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(
            token::verify(&pair.refresh_token, &config.access_secret),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn refresh_reissues_a_valid_access_token() {
        let config = config();
        let account = account();
        let pair = issue_session_tokens(&account, &config).unwrap();

        let access = refresh_access_token(&pair.refresh_token, &config).unwrap();
        let verified = token::verify(&access, &config.access_secret).unwrap();
        assert_eq!(verified.account_id(), account.id);
        assert_eq!(verified.email(), account.email);
    }

    #[test]
    fn refresh_rejects_an_access_token() {
        let config = config();
        let pair = issue_session_tokens(&account(), &config).unwrap();

        assert!(matches!(
            refresh_access_token(&pair.access_token, &config),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn refresh_rejects_an_expired_refresh_token() {
        let mut config = config();
        config.refresh_ttl = Duration::seconds(-5);
        let pair = issue_session_tokens(&account(), &config).unwrap();

        config.refresh_ttl = Duration::seconds(3600);
        assert!(matches!(
            refresh_access_token(&pair.refresh_token, &config),
            Err(AuthError::TokenExpired)
        ));
    }
}
