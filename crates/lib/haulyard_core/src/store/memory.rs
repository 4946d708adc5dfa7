//! In-memory account store for tests and local development.
//!
//! Mirrors the PostgreSQL backend's semantics: case-sensitive unique
//! emails, idempotent push-token and provider-link updates, newest-first
//! listing.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AccountFilter, AccountStore, NewAccount, ProfilePatch, Result, StoreError};
use crate::models::account::{Account, ActiveStatus, AuthProvider};

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Result<Option<Account>>
    where
        F: FnOnce(&mut Account),
    {
        let mut accounts = self.accounts.lock().await;
        Ok(accounts.get_mut(&id).map(|account| {
            apply(account);
            account.updated_at = Utc::now();
            account.clone()
        }))
    }
}

fn matches(account: &Account, filter: &AccountFilter) -> bool {
    if let Some(role) = filter.role {
        if account.role != role {
            return false;
        }
    }
    if account.is_deleted && !filter.include_deleted {
        return false;
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let hit = account.name.to_lowercase().contains(&needle)
            || account.email.to_lowercase().contains(&needle)
            || account
                .phone
                .as_ref()
                .is_some_and(|p| p.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    true
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, new: NewAccount) -> Result<Account> {
        let mut accounts = self.accounts.lock().await;
        if accounts.values().any(|a| a.email == new.email) {
            return Err(StoreError::DuplicateEmail(new.email));
        }
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            phone: new.phone,
            address: new.address,
            picture: new.picture,
            role: new.role,
            active_status: ActiveStatus::Active,
            is_deleted: false,
            is_verified: new.is_verified,
            auth_providers: Vec::new(),
            push_tokens: Vec::new(),
            receive_notifications: true,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.values().any(|a| a.email == email))
    }

    async fn list(&self, filter: &AccountFilter) -> Result<(Vec<Account>, i64)> {
        let accounts = self.accounts.lock().await;
        let mut selected: Vec<Account> = accounts
            .values()
            .filter(|a| matches(a, filter))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = selected.len() as i64;
        Ok((selected, total))
    }

    async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> Result<Option<Account>> {
        let patch = patch.clone();
        self.update(id, move |account| {
            if let Some(name) = patch.name {
                account.name = name;
            }
            if let Some(phone) = patch.phone {
                account.phone = Some(phone);
            }
            if let Some(address) = patch.address {
                account.address = Some(address);
            }
            if let Some(picture) = patch.picture {
                account.picture = Some(picture);
            }
        })
        .await
    }

    async fn set_active_status(&self, id: Uuid, status: ActiveStatus) -> Result<Option<Account>> {
        self.update(id, |account| account.active_status = status).await
    }

    async fn set_deleted(&self, id: Uuid, deleted: bool) -> Result<Option<Account>> {
        self.update(id, |account| account.is_deleted = deleted).await
    }

    async fn set_verified(&self, id: Uuid, verified: bool) -> Result<Option<Account>> {
        self.update(id, |account| account.is_verified = verified).await
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<Option<Account>> {
        let hash = hash.to_owned();
        self.update(id, move |account| account.password_hash = Some(hash))
            .await
    }

    async fn add_push_token(&self, id: Uuid, token: &str) -> Result<Option<Account>> {
        let token = token.to_owned();
        self.update(id, move |account| {
            if !account.push_tokens.contains(&token) {
                account.push_tokens.push(token);
            }
        })
        .await
    }

    async fn link_provider(&self, id: Uuid, provider: &AuthProvider) -> Result<Option<Account>> {
        let provider = provider.clone();
        self.update(id, move |account| {
            if !account.auth_providers.contains(&provider) {
                account.auth_providers.push(provider);
            }
        })
        .await
    }
}
