//! Account domain model.
//!
//! These are internal domain models, distinct from API wire models
//! (which carry `#[serde(rename)]` for camelCase etc.).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Closed set — parsed exhaustively at every boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Driver,
}

impl Role {
    /// Wire/storage form (`ADMIN`, `DRIVER`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Driver => "DRIVER",
        }
    }

    /// Parse the wire/storage form. `None` for anything outside the set.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "DRIVER" => Some(Role::Driver),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account activity status.
///
/// `Blocked` and `Inactive` accounts never authenticate. The original
/// schema carried a separate `isblocked` flag next to this enum; the enum
/// is the single source of truth here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActiveStatus {
    Active,
    Inactive,
    Blocked,
}

impl ActiveStatus {
    /// Wire/storage form (`ACTIVE`, `INACTIVE`, `BLOCKED`).
    pub const fn as_str(self) -> &'static str {
        match self {
            ActiveStatus::Active => "ACTIVE",
            ActiveStatus::Inactive => "INACTIVE",
            ActiveStatus::Blocked => "BLOCKED",
        }
    }

    /// Parse the wire/storage form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(ActiveStatus::Active),
            "INACTIVE" => Some(ActiveStatus::Inactive),
            "BLOCKED" => Some(ActiveStatus::Blocked),
            _ => None,
        }
    }
}

impl fmt::Display for ActiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External identity provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProviderKind {
    Google,
    Apple,
}

/// A linked external identity provider record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthProvider {
    pub provider: AuthProviderKind,
    pub provider_id: String,
}

/// A registered principal (driver or administrator).
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// Unique, stored case-sensitive.
    pub email: String,
    /// `None` when the account was provisioned only via an external
    /// identity provider.
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub picture: Option<String>,
    pub role: Role,
    pub active_status: ActiveStatus,
    /// Soft delete — records are never hard-deleted through normal flows.
    pub is_deleted: bool,
    pub is_verified: bool,
    pub auth_providers: Vec<AuthProvider>,
    /// Push-notification target tokens.
    pub push_tokens: Vec<String>,
    pub receive_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
