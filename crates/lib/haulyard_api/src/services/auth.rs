//! Authentication service — login, stateless refresh, current-account lookup.

use haulyard_core::auth::password::verify_password;
use haulyard_core::auth::session::{self, SessionConfig};
use haulyard_core::models::account::ActiveStatus;
use haulyard_core::store::AccountStore;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::models::{AccountResponse, RefreshResponse, TokenResponse};

/// Authenticate with email + password and mint a session token pair.
///
/// Every rejection cause collapses into [`AppError::InvalidCredentials`] so
/// the response cannot be used to probe which emails are registered or what
/// state an account is in. The specific cause is logged instead.
pub async fn login(
    store: &dyn AccountStore,
    config: &SessionConfig,
    email: &str,
    password: &str,
) -> AppResult<TokenResponse> {
    let account = match store.find_by_email(email).await? {
        Some(a) => a,
        None => {
            warn!(email, "login rejected: unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };

    let hash = match &account.password_hash {
        Some(h) => h,
        None => {
            warn!(account_id = %account.id, "login rejected: no password set (provider-only account)");
            return Err(AppError::InvalidCredentials);
        }
    };

    let password_ok = verify_password(password, hash).map_err(AppError::from)?;
    if !password_ok {
        warn!(account_id = %account.id, "login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    // Status checks run after the password check; an account's state is
    // never disclosed to a caller who cannot authenticate to it.
    if account.is_deleted {
        warn!(account_id = %account.id, "login rejected: account deleted");
        return Err(AppError::InvalidCredentials);
    }
    if !account.is_verified {
        warn!(account_id = %account.id, "login rejected: email not verified");
        return Err(AppError::InvalidCredentials);
    }
    if matches!(
        account.active_status,
        ActiveStatus::Blocked | ActiveStatus::Inactive
    ) {
        warn!(
            account_id = %account.id,
            status = account.active_status.as_str(),
            "login rejected: account disabled"
        );
        return Err(AppError::InvalidCredentials);
    }

    let pair = session::issue_session_tokens(&account, config)?;
    info!(account_id = %account.id, role = account.role.as_str(), "login successful");

    Ok(TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: config.access_ttl.num_seconds(),
        token_type: "Bearer".to_string(),
        user: AccountResponse::from(account),
    })
}

/// Exchange a refresh token for a fresh access token.
///
/// Stateless: the refresh token is verified against the refresh secret and
/// a new access token is minted from its claims. No store access and no
/// rotation; account status is enforced when the access token is used.
pub fn refresh(config: &SessionConfig, refresh_token: &str) -> AppResult<RefreshResponse> {
    let access_token = session::refresh_access_token(refresh_token, config)?;
    Ok(RefreshResponse {
        access_token,
        expires_in: config.access_ttl.num_seconds(),
        token_type: "Bearer".to_string(),
    })
}

/// Sanitized account record for the authenticated caller.
pub async fn me(store: &dyn AccountStore, user: &CurrentUser) -> AppResult<AccountResponse> {
    let account = store
        .find_by_id(user.id)
        .await?
        .ok_or(AppError::AccountNotFound)?;
    Ok(AccountResponse::from(account))
}
