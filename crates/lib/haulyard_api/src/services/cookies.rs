//! Cookie service — set/get/clear httpOnly auth cookies.
//!
//! Cookie names: `haulyard_access`, `haulyard_refresh`. The Secure
//! attribute comes from `COOKIE_SECURE` so local HTTP development works
//! while deployments stay HTTPS-only.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Cookie name for the access token.
pub const ACCESS_COOKIE: &str = "haulyard_access";
/// Cookie name for the refresh token.
pub const REFRESH_COOKIE: &str = "haulyard_refresh";

fn auth_cookie(name: &str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(max_age)
        .build()
}

/// Build a httpOnly cookie carrying the access token.
pub fn access_cookie(token: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    auth_cookie(
        ACCESS_COOKIE,
        token.to_string(),
        Duration::seconds(max_age_secs),
        secure,
    )
}

/// Build a httpOnly cookie carrying the refresh token.
pub fn refresh_cookie(token: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    auth_cookie(
        REFRESH_COOKIE,
        token.to_string(),
        Duration::seconds(max_age_secs),
        secure,
    )
}

/// Build an expired cookie to clear the access token.
pub fn clear_access_cookie(secure: bool) -> Cookie<'static> {
    auth_cookie(ACCESS_COOKIE, String::new(), Duration::ZERO, secure)
}

/// Build an expired cookie to clear the refresh token.
pub fn clear_refresh_cookie(secure: bool) -> Cookie<'static> {
    auth_cookie(REFRESH_COOKIE, String::new(), Duration::ZERO, secure)
}
