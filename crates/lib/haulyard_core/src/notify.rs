//! Realtime notification seam.
//!
//! Account lifecycle changes are published to a per-account channel so a
//! connected client can react immediately (for example, a blocked driver's
//! app drops to the login screen). The publisher is fire-and-forget; a lost
//! event is acceptable because the request authenticator re-checks account
//! status on every call.

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Event vocabulary shared with the mobile client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationKind {
    Ticket,
    System,
    Summary,
}

impl NotificationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Ticket => "TICKET",
            NotificationKind::System => "SYSTEM",
            NotificationKind::Summary => "SUMMARY",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

impl NotificationEvent {
    pub fn system(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::System,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Channel name for a single account's notifications.
pub fn account_channel(account_id: Uuid) -> String {
    format!("notification_{account_id}")
}

#[async_trait]
pub trait ChannelPublisher: Send + Sync {
    /// Publish an event to a channel. Delivery is best-effort.
    async fn publish(&self, channel: &str, event: &NotificationEvent);
}

/// Publisher that logs events instead of delivering them.
pub struct LogPublisher;

#[async_trait]
impl ChannelPublisher for LogPublisher {
    async fn publish(&self, channel: &str, event: &NotificationEvent) {
        info!(
            channel,
            kind = event.kind.as_str(),
            title = %event.title,
            "publishing notification"
        );
    }
}
