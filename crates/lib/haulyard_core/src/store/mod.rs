//! Account store — the persistence collaborator behind a trait seam.
//!
//! The authentication pipeline and the account handlers talk to
//! [`AccountStore`] only; `PgAccountStore` is the production backend and
//! `MemoryAccountStore` backs tests and the `--memory-store` dev mode.
//! Authentication itself only ever reads.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::account::{Account, ActiveStatus, AuthProvider, Role};

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unique-email violation on insert.
    #[error("duplicate email: {0}")]
    DuplicateEmail(String),

    /// A stored row failed enum/shape validation on read.
    #[error("corrupt account record: {0}")]
    InvalidData(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Input for account creation.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub picture: Option<String>,
    pub role: Role,
    pub is_verified: bool,
}

/// Profile fields to update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub picture: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.picture.is_none()
    }
}

/// Listing filter. Deleted accounts are excluded unless asked for.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub role: Option<Role>,
    /// Case-insensitive substring match over name, email, and phone.
    pub search: Option<String>,
    pub include_deleted: bool,
}

/// Persistence operations for accounts.
///
/// Update operations return the updated record, or `None` when no account
/// has the given id.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert(&self, new: NewAccount) -> Result<Account>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Matching accounts plus the total match count.
    async fn list(&self, filter: &AccountFilter) -> Result<(Vec<Account>, i64)>;

    async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> Result<Option<Account>>;

    async fn set_active_status(&self, id: Uuid, status: ActiveStatus) -> Result<Option<Account>>;

    async fn set_deleted(&self, id: Uuid, deleted: bool) -> Result<Option<Account>>;

    async fn set_verified(&self, id: Uuid, verified: bool) -> Result<Option<Account>>;

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<Option<Account>>;

    /// Register a push-notification target. Idempotent — re-registering
    /// an existing token leaves the record unchanged.
    async fn add_push_token(&self, id: Uuid, token: &str) -> Result<Option<Account>>;

    /// Link an external identity provider. Idempotent on the exact
    /// (provider, provider_id) pair.
    async fn link_provider(&self, id: Uuid, provider: &AuthProvider) -> Result<Option<Account>>;
}
