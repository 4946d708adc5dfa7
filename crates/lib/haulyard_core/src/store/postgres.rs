//! PostgreSQL account store.
//!
//! Role and status are stored as text and parsed exhaustively on read;
//! provider links live in a JSONB column, push tokens in a text array.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AccountFilter, AccountStore, NewAccount, ProfilePatch, Result, StoreError};
use crate::models::account::{Account, ActiveStatus, AuthProvider, Role};

/// Column list shared by every query that reads a full account row.
const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, phone, address, picture, \
     role, active_status, is_deleted, is_verified, auth_providers, push_tokens, \
     receive_notifications, created_at, updated_at";

/// Raw database row, converted to the domain model after enum parsing.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    picture: Option<String>,
    role: String,
    active_status: String,
    is_deleted: bool,
    is_verified: bool,
    auth_providers: serde_json::Value,
    push_tokens: Vec<String>,
    receive_notifications: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| StoreError::InvalidData(format!("unknown role '{}'", row.role)))?;
        let active_status = ActiveStatus::parse(&row.active_status).ok_or_else(|| {
            StoreError::InvalidData(format!("unknown active status '{}'", row.active_status))
        })?;
        let auth_providers: Vec<AuthProvider> = serde_json::from_value(row.auth_providers)
            .map_err(|e| StoreError::InvalidData(format!("auth_providers: {e}")))?;

        Ok(Account {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            phone: row.phone,
            address: row.address,
            picture: row.picture,
            role,
            active_status,
            is_deleted: row.is_deleted,
            is_verified: row.is_verified,
            auth_providers,
            push_tokens: row.push_tokens,
            receive_notifications: row.receive_notifications,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Account store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert(&self, new: NewAccount) -> Result<Account> {
        let sql = format!(
            "INSERT INTO accounts \
                 (name, email, password_hash, phone, address, picture, role, is_verified) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.password_hash)
            .bind(&new.phone)
            .bind(&new.address)
            .bind(&new.picture)
            .bind(new.role.as_str())
            .bind(new.is_verified)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::DuplicateEmail(new.email.clone())
                }
                _ => StoreError::Database(e),
            })?;
        Account::try_from(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn list(&self, filter: &AccountFilter) -> Result<(Vec<Account>, i64)> {
        const WHERE_CLAUSE: &str = "($1::text IS NULL OR role = $1) \
             AND ($2::text IS NULL OR name ILIKE $2 OR email ILIKE $2 OR phone ILIKE $2) \
             AND (is_deleted = FALSE OR $3)";

        let role = filter.role.map(Role::as_str);
        let pattern = filter.search.as_deref().map(ilike_pattern);

        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts \
             WHERE {WHERE_CLAUSE} ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(role)
            .bind(&pattern)
            .bind(filter.include_deleted)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM accounts WHERE {WHERE_CLAUSE}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(role)
            .bind(&pattern)
            .bind(filter.include_deleted)
            .fetch_one(&self.pool)
            .await?;

        let accounts = rows
            .into_iter()
            .map(Account::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok((accounts, total))
    }

    async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> Result<Option<Account>> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }
        let sql = format!(
            "UPDATE accounts SET \
                 name = COALESCE($2, name), \
                 phone = COALESCE($3, phone), \
                 address = COALESCE($4, address), \
                 picture = COALESCE($5, picture), \
                 updated_at = now() \
             WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.phone)
            .bind(&patch.address)
            .bind(&patch.picture)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn set_active_status(&self, id: Uuid, status: ActiveStatus) -> Result<Option<Account>> {
        let sql = format!(
            "UPDATE accounts SET active_status = $2, updated_at = now() \
             WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn set_deleted(&self, id: Uuid, deleted: bool) -> Result<Option<Account>> {
        let sql = format!(
            "UPDATE accounts SET is_deleted = $2, updated_at = now() \
             WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .bind(deleted)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn set_verified(&self, id: Uuid, verified: bool) -> Result<Option<Account>> {
        let sql = format!(
            "UPDATE accounts SET is_verified = $2, updated_at = now() \
             WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .bind(verified)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<Option<Account>> {
        let sql = format!(
            "UPDATE accounts SET password_hash = $2, updated_at = now() \
             WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .bind(hash)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn add_push_token(&self, id: Uuid, token: &str) -> Result<Option<Account>> {
        let sql = format!(
            "UPDATE accounts SET \
                 push_tokens = (CASE WHEN $2 = ANY(push_tokens) THEN push_tokens \
                                ELSE array_append(push_tokens, $2) END), \
                 updated_at = now() \
             WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn link_provider(&self, id: Uuid, provider: &AuthProvider) -> Result<Option<Account>> {
        let entry = serde_json::to_value(std::slice::from_ref(provider))
            .map_err(|e| StoreError::InvalidData(format!("auth provider encode: {e}")))?;
        let sql = format!(
            "UPDATE accounts SET \
                 auth_providers = (CASE WHEN auth_providers @> $2 THEN auth_providers \
                                   ELSE auth_providers || $2 END), \
                 updated_at = now() \
             WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .bind(entry)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }
}

/// Build an `ILIKE` pattern that matches the term literally. `\`, `%` and
/// `_` are escaped so a search for "10%" does not match "105".
fn ilike_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
