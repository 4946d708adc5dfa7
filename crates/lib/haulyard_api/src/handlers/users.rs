//! Account management request handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::models::{
    AccountListResponse, AccountResponse, CreateAccountRequest, ForgotPasswordRequest,
    ListAccountsQuery, MessageResponse, PushTokenRequest, RegisterRequest, ResetPasswordRequest,
    UpdateProfileRequest, VerifyOtpRequest,
};
use crate::services::users;

/// `POST /users/register` — self-service driver signup.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let response = users::register(
        state.store.as_ref(),
        &state.otp,
        state.mailer.as_ref(),
        body,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /users/verify-otp` — mark an account verified.
pub async fn verify_otp_handler(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> AppResult<Json<AccountResponse>> {
    let response = users::verify_otp(state.store.as_ref(), &state.otp, &body.email, &body.otp).await?;
    Ok(Json(response))
}

/// `POST /users/forgot-password` — issue a reset code. The response is the
/// same whether or not the email is registered.
pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    users::forgot_password(
        state.store.as_ref(),
        &state.otp,
        state.mailer.as_ref(),
        &body.email,
    )
    .await?;
    Ok(Json(MessageResponse {
        message: "OTP sent to your email".into(),
    }))
}

/// `POST /users/reset-password` — consume a reset code and set a new password.
pub async fn reset_password_handler(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    users::reset_password(
        state.store.as_ref(),
        &state.otp,
        &body.email,
        &body.otp,
        &body.new_password,
    )
    .await?;
    Ok(Json(MessageResponse {
        message: "Password reset successfully".into(),
    }))
}

/// `POST /users` — admin-side account creation.
pub async fn create_account_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let response = users::create_account(state.store.as_ref(), body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /users` — list accounts with optional role/search filters.
pub async fn list_accounts_handler(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> AppResult<Json<AccountListResponse>> {
    let response = users::list_accounts(state.store.as_ref(), query).await?;
    Ok(Json(response))
}

/// `GET /users/{id}` — fetch one account.
pub async fn get_account_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    let response = users::get_account(state.store.as_ref(), id).await?;
    Ok(Json(response))
}

/// `PATCH /users/{id}` — update profile fields on any account.
pub async fn update_account_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Json<AccountResponse>> {
    let response = users::update_account(state.store.as_ref(), id, body).await?;
    Ok(Json(response))
}

/// `DELETE /users/{id}` — soft-delete an account.
pub async fn delete_account_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    let response =
        users::delete_account(state.store.as_ref(), state.publisher.as_ref(), id).await?;
    Ok(Json(response))
}

/// `POST /users/{id}/block` — set active status to BLOCKED.
pub async fn block_account_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    let response =
        users::block_account(state.store.as_ref(), state.publisher.as_ref(), id).await?;
    Ok(Json(response))
}

/// `POST /users/{id}/unblock` — restore active status to ACTIVE.
pub async fn unblock_account_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    let response =
        users::unblock_account(state.store.as_ref(), state.publisher.as_ref(), id).await?;
    Ok(Json(response))
}

/// `PATCH /users/me` — profile update for the authenticated account.
pub async fn update_me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Json<AccountResponse>> {
    let response = users::update_me(state.store.as_ref(), &user, body).await?;
    Ok(Json(response))
}

/// `POST /users/me/push-tokens` — register a push target. Idempotent.
pub async fn add_push_token_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<PushTokenRequest>,
) -> AppResult<Json<AccountResponse>> {
    let response = users::add_push_token(state.store.as_ref(), &user, &body.token).await?;
    Ok(Json(response))
}
