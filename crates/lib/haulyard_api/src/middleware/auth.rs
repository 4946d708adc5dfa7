//! Authentication middleware — token extraction, verification, and account
//! status checks.
//!
//! Per request the steps run strictly in order: extract a credential
//! (bearer header, then access cookie), verify it against the access
//! secret, load the account, reject deleted or disabled accounts, then
//! attach [`CurrentUser`] to request extensions. Role checks come after,
//! via [`authorize`] or the [`require_admin`] layer, and operate only on
//! the attached identity, never on raw token claims.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use haulyard_core::auth::token;
use haulyard_core::models::account::{ActiveStatus, Role};
use tracing::{error, warn};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::services::cookies::ACCESS_COOKIE;

/// Normalized identity attached to request extensions after a successful
/// authentication. Fields reflect the account record as loaded for this
/// request, not the token claims.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub active_status: ActiveStatus,
}

/// Pull the access token from the request: `Authorization: Bearer` wins,
/// the access cookie is the fallback.
fn extract_token(request: &Request) -> Option<String> {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned);
    if bearer.is_some() {
        return bearer;
    }
    CookieJar::from_headers(request.headers())
        .get(ACCESS_COOKIE)
        .map(|c| c.value().to_owned())
}

/// Axum middleware guarding every protected route.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request).ok_or(AppError::NoCredential)?;

    let claims = token::verify(&token, &state.config.session.access_secret)?;

    let account = match state.store.find_by_id(claims.account_id()).await {
        Ok(found) => found,
        Err(e) => {
            // Store trouble surfaces to the client like a missing account;
            // the real cause stays in the log.
            error!(error = %e, "account lookup failed during authentication");
            None
        }
    };
    let account = account.ok_or(AppError::AccountNotFound)?;

    if account.is_deleted {
        warn!(account_id = %account.id, "deleted account presented a valid token");
        return Err(AppError::AccountDeleted);
    }
    if matches!(
        account.active_status,
        ActiveStatus::Blocked | ActiveStatus::Inactive
    ) {
        warn!(
            account_id = %account.id,
            status = account.active_status.as_str(),
            "disabled account presented a valid token"
        );
        return Err(AppError::AccountDisabled(account.active_status));
    }

    request.extensions_mut().insert(CurrentUser {
        id: account.id,
        email: account.email,
        role: account.role,
        name: account.name,
        active_status: account.active_status,
    });

    Ok(next.run(request).await)
}

/// Role gate. An empty allow list means the route needs authentication
/// only; otherwise the identity's role must be in the list.
pub fn authorize(user: &CurrentUser, allowed_roles: &[Role]) -> Result<(), AppError> {
    if allowed_roles.is_empty() || allowed_roles.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Axum middleware for admin-only route groups. Must be layered inside
/// [`authenticate`], which is what populates the extension it reads.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::NoCredential)?;
    authorize(user, &[Role::Admin])?;
    Ok(next.run(request).await)
}
