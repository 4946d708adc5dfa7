//! Authentication request handlers.

use axum::extract::State;
use axum::{Extension, Json};
use axum_extra::extract::CookieJar;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::models::{
    AccountResponse, LoginRequest, LogoutResponse, RefreshRequest, RefreshResponse, TokenResponse,
};
use crate::services::{auth, cookies};

/// `POST /auth/login` — authenticate with email + password.
///
/// Sets httpOnly cookies for both tokens alongside the JSON body.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<TokenResponse>)> {
    let response = auth::login(
        state.store.as_ref(),
        &state.config.session,
        &body.email,
        &body.password,
    )
    .await?;

    let secure = state.config.cookie_secure;
    let jar = jar
        .add(cookies::access_cookie(
            &response.access_token,
            state.config.session.access_ttl.num_seconds(),
            secure,
        ))
        .add(cookies::refresh_cookie(
            &response.refresh_token,
            state.config.session.refresh_ttl.num_seconds(),
            secure,
        ));
    Ok((jar, Json(response)))
}

/// `POST /auth/refresh` — exchange a refresh token (body or cookie) for a
/// fresh access token. Re-sets the access cookie.
pub async fn refresh_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RefreshRequest>,
) -> AppResult<(CookieJar, Json<RefreshResponse>)> {
    let token = body
        .refresh_token
        .or_else(|| {
            jar.get(cookies::REFRESH_COOKIE)
                .map(|c| c.value().to_owned())
        })
        .ok_or(AppError::NoCredential)?;

    let response = auth::refresh(&state.config.session, &token)?;

    let jar = jar.add(cookies::access_cookie(
        &response.access_token,
        state.config.session.access_ttl.num_seconds(),
        state.config.cookie_secure,
    ));
    Ok((jar, Json(response)))
}

/// `POST /auth/logout` — clear both auth cookies. Succeeds whether or not
/// the caller was authenticated.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    let secure = state.config.cookie_secure;
    let jar = jar
        .add(cookies::clear_access_cookie(secure))
        .add(cookies::clear_refresh_cookie(secure));
    (jar, Json(LogoutResponse { success: true }))
}

/// `GET /auth/me` — sanitized record for the authenticated account.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AccountResponse>> {
    let response = auth::me(state.store.as_ref(), &user).await?;
    Ok(Json(response))
}
