//! # haulyard_api
//!
//! HTTP API library for Haulyard.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use haulyard_core::mail::Mailer;
use haulyard_core::notify::ChannelPublisher;
use haulyard_core::otp::OtpStore;
use haulyard_core::store::AccountStore;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{auth, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Account persistence.
    pub store: Arc<dyn AccountStore>,
    /// API configuration.
    pub config: ApiConfig,
    /// Pending one-time codes.
    pub otp: Arc<OtpStore>,
    /// Outbound mail.
    pub mailer: Arc<dyn Mailer>,
    /// Realtime notification fan-out.
    pub publisher: Arc<dyn ChannelPublisher>,
}

/// Run embedded database migrations.
///
/// Delegates to `haulyard_core::migrate::migrate()` which owns the migration
/// files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    haulyard_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/refresh", post(auth::refresh_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/users/register", post(users::register_handler))
        .route("/users/verify-otp", post(users::verify_otp_handler))
        .route("/users/forgot-password", post(users::forgot_password_handler))
        .route("/users/reset-password", post(users::reset_password_handler));

    // Admin routes (require auth + ADMIN role)
    let admin = Router::new()
        .route(
            "/users",
            post(users::create_account_handler).get(users::list_accounts_handler),
        )
        .route(
            "/users/{id}",
            get(users::get_account_handler)
                .patch(users::update_account_handler)
                .delete(users::delete_account_handler),
        )
        .route("/users/{id}/block", post(users::block_account_handler))
        .route("/users/{id}/unblock", post(users::unblock_account_handler))
        .route_layer(axum::middleware::from_fn(
            middleware::auth::require_admin,
        ));

    // Protected routes (require auth)
    let protected = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/users/me", patch(users::update_me_handler))
        .route("/users/me/push-tokens", post(users::add_push_token_handler))
        .merge(admin)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
