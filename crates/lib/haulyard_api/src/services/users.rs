//! Account management service — registration, verification, password reset,
//! and the admin surface (create/list/update/block/unblock/soft-delete).

use haulyard_core::auth::password::hash_password;
use haulyard_core::mail::Mailer;
use haulyard_core::models::account::{ActiveStatus, Role};
use haulyard_core::notify::{ChannelPublisher, NotificationEvent, account_channel};
use haulyard_core::otp::{OtpPurpose, OtpStore};
use haulyard_core::store::{AccountFilter, AccountStore, NewAccount, ProfilePatch};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::models::{
    AccountListResponse, AccountResponse, CreateAccountRequest, ListAccountsQuery,
    RegisterRequest, UpdateProfileRequest,
};

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".into()));
    }
    Ok(())
}

fn validate_email(email: &str) -> AppResult<()> {
    let well_formed = email.contains('@')
        && !email.starts_with('@')
        && !email.ends_with('@')
        && !email.contains(char::is_whitespace);
    if !well_formed {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    Ok(())
}

/// Send a one-time code, logging instead of failing the request when the
/// mailer is down. The caller can always re-request a code.
async fn send_code(mailer: &dyn Mailer, to: &str, code: &str) {
    if let Err(e) = mailer.send_otp(to, code).await {
        warn!(to, error = %e, "failed to send one-time code");
    }
}

// ---------------------------------------------------------------------------
// Self-service registration and verification
// ---------------------------------------------------------------------------

/// Self-service signup. The role is always DRIVER and the account starts
/// unverified; no tokens are issued until the email is verified.
///
/// Registering an email that already holds an unverified account re-issues
/// its verification code instead of conflicting, so an expired or undelivered
/// code can always be replaced.
pub async fn register(
    store: &dyn AccountStore,
    otp: &OtpStore,
    mailer: &dyn Mailer,
    request: RegisterRequest,
) -> AppResult<AccountResponse> {
    validate_name(&request.name)?;
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    // The unique constraint still catches concurrent inserts.
    if let Some(existing) = store.find_by_email(&request.email).await? {
        if existing.is_verified || existing.is_deleted {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        let code = otp.issue(&existing.email, OtpPurpose::VerifyEmail);
        send_code(mailer, &existing.email, &code).await;
        info!(account_id = %existing.id, "verification code re-issued for unverified account");
        return Ok(AccountResponse::from(existing));
    }

    let account = store
        .insert(NewAccount {
            name: request.name,
            email: request.email,
            password_hash: Some(hash_password(&request.password)?),
            phone: request.phone,
            address: request.address,
            picture: None,
            role: Role::Driver,
            is_verified: false,
        })
        .await?;

    let code = otp.issue(&account.email, OtpPurpose::VerifyEmail);
    send_code(mailer, &account.email, &code).await;
    info!(account_id = %account.id, "driver registered, verification code issued");

    Ok(AccountResponse::from(account))
}

/// Consume a verification code and mark the account verified.
pub async fn verify_otp(
    store: &dyn AccountStore,
    otp: &OtpStore,
    email: &str,
    code: &str,
) -> AppResult<AccountResponse> {
    if !otp.consume(email, OtpPurpose::VerifyEmail, code) {
        return Err(AppError::Validation("Invalid or expired OTP".into()));
    }

    let account = store
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))?;
    let account = store
        .set_verified(account.id, true)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))?;

    info!(account_id = %account.id, "email verified");
    Ok(AccountResponse::from(account))
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

/// Issue a password-reset code when the account exists. Always succeeds
/// from the caller's point of view so the endpoint cannot be used to probe
/// for registered emails.
pub async fn forgot_password(
    store: &dyn AccountStore,
    otp: &OtpStore,
    mailer: &dyn Mailer,
    email: &str,
) -> AppResult<()> {
    match store.find_by_email(email).await? {
        Some(account) if !account.is_deleted => {
            let code = otp.issue(email, OtpPurpose::ResetPassword);
            send_code(mailer, email, &code).await;
            info!(account_id = %account.id, "password reset code issued");
        }
        _ => {
            info!(email, "password reset requested for unknown or deleted account");
        }
    }
    Ok(())
}

/// Consume a reset code and store a fresh password hash.
pub async fn reset_password(
    store: &dyn AccountStore,
    otp: &OtpStore,
    email: &str,
    code: &str,
    new_password: &str,
) -> AppResult<()> {
    validate_password(new_password)?;

    if !otp.consume(email, OtpPurpose::ResetPassword, code) {
        return Err(AppError::Validation("Invalid or expired OTP".into()));
    }

    let account = store
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))?;
    store
        .set_password_hash(account.id, &hash_password(new_password)?)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))?;

    info!(account_id = %account.id, "password reset completed");
    Ok(())
}

// ---------------------------------------------------------------------------
// Admin surface
// ---------------------------------------------------------------------------

/// Admin-side account creation. The role comes from the request and the
/// account is verified from the start.
pub async fn create_account(
    store: &dyn AccountStore,
    request: CreateAccountRequest,
) -> AppResult<AccountResponse> {
    validate_name(&request.name)?;
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    if store.email_exists(&request.email).await? {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let account = store
        .insert(NewAccount {
            name: request.name,
            email: request.email,
            password_hash: Some(hash_password(&request.password)?),
            phone: request.phone,
            address: request.address,
            picture: request.picture,
            role: request.role,
            is_verified: true,
        })
        .await?;

    info!(account_id = %account.id, role = account.role.as_str(), "account created by admin");
    Ok(AccountResponse::from(account))
}

pub async fn list_accounts(
    store: &dyn AccountStore,
    query: ListAccountsQuery,
) -> AppResult<AccountListResponse> {
    let role = match &query.role {
        Some(raw) => Some(
            Role::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown role '{raw}'")))?,
        ),
        None => None,
    };

    let filter = AccountFilter {
        role,
        search: query.search_term,
        include_deleted: query.include_deleted,
    };
    let (accounts, total) = store.list(&filter).await?;

    Ok(AccountListResponse {
        accounts: accounts.into_iter().map(AccountResponse::from).collect(),
        total,
    })
}

pub async fn get_account(store: &dyn AccountStore, id: Uuid) -> AppResult<AccountResponse> {
    let account = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))?;
    Ok(AccountResponse::from(account))
}

/// Patch profile fields on an account. Rejects an empty patch outright.
pub async fn update_account(
    store: &dyn AccountStore,
    id: Uuid,
    request: UpdateProfileRequest,
) -> AppResult<AccountResponse> {
    if let Some(name) = &request.name {
        validate_name(name)?;
    }
    let patch = ProfilePatch {
        name: request.name,
        phone: request.phone,
        address: request.address,
        picture: request.picture,
    };
    if patch.is_empty() {
        return Err(AppError::Validation("No fields to update".into()));
    }

    let account = store
        .update_profile(id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))?;
    Ok(AccountResponse::from(account))
}

/// Profile update for the authenticated caller.
pub async fn update_me(
    store: &dyn AccountStore,
    user: &CurrentUser,
    request: UpdateProfileRequest,
) -> AppResult<AccountResponse> {
    update_account(store, user.id, request).await
}

pub async fn block_account(
    store: &dyn AccountStore,
    publisher: &dyn ChannelPublisher,
    id: Uuid,
) -> AppResult<AccountResponse> {
    let account = store
        .set_active_status(id, ActiveStatus::Blocked)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))?;

    publisher
        .publish(
            &account_channel(account.id),
            &NotificationEvent::system(
                "Account blocked",
                "Your account has been blocked by an administrator.",
            ),
        )
        .await;
    info!(account_id = %account.id, "account blocked");
    Ok(AccountResponse::from(account))
}

pub async fn unblock_account(
    store: &dyn AccountStore,
    publisher: &dyn ChannelPublisher,
    id: Uuid,
) -> AppResult<AccountResponse> {
    let account = store
        .set_active_status(id, ActiveStatus::Active)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))?;

    publisher
        .publish(
            &account_channel(account.id),
            &NotificationEvent::system(
                "Account unblocked",
                "Your account has been reactivated.",
            ),
        )
        .await;
    info!(account_id = %account.id, "account unblocked");
    Ok(AccountResponse::from(account))
}

/// Soft-delete: the record is kept but the account can never authenticate
/// again.
pub async fn delete_account(
    store: &dyn AccountStore,
    publisher: &dyn ChannelPublisher,
    id: Uuid,
) -> AppResult<AccountResponse> {
    let account = store
        .set_deleted(id, true)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))?;

    publisher
        .publish(
            &account_channel(account.id),
            &NotificationEvent::system(
                "Account deleted",
                "Your account has been removed by an administrator.",
            ),
        )
        .await;
    info!(account_id = %account.id, "account soft-deleted");
    Ok(AccountResponse::from(account))
}

// ---------------------------------------------------------------------------
// Push tokens
// ---------------------------------------------------------------------------

/// Register a push-notification target for the caller. Idempotent.
pub async fn add_push_token(
    store: &dyn AccountStore,
    user: &CurrentUser,
    token: &str,
) -> AppResult<AccountResponse> {
    if token.trim().is_empty() {
        return Err(AppError::Validation("Push token must not be empty".into()));
    }
    let account = store
        .add_push_token(user.id, token)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))?;
    Ok(AccountResponse::from(account))
}
