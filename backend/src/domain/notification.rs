//! User-facing notification rows.
//!
//! Notifications are a side effect of every workflow. Failures writing them
//! are logged and swallowed so they can never break the operation that
//! produced them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::identity::TelegramId;
use super::ports::NotificationRepository;

/// Identifier of a notification row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generate a random id. Primarily useful for tests.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Error parsing an unknown notification kind tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification kind: {0}")]
pub struct ParseNotificationKindError(pub String);

/// Severity/tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Positive outcome (task completed, reward credited).
    Success,
    /// Something needs attention but nothing failed.
    Warning,
    /// Neutral information (submission queued, request under review).
    Info,
    /// A failure the user should know about.
    Error,
}

impl NotificationKind {
    /// The snake_case tag persisted in the store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = ParseNotificationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "error" => Ok(Self::Error),
            other => Err(ParseNotificationKindError(other.to_owned())),
        }
    }
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Row identifier.
    pub id: NotificationId,
    /// The recipient.
    pub user: TelegramId,
    /// Severity/tone.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Whether the user has opened it.
    pub is_read: bool,
    /// Optional link the client may follow.
    pub action_url: Option<String>,
    /// Free-form extra payload.
    pub metadata: Value,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    /// The recipient.
    pub user: TelegramId,
    /// Severity/tone.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Optional link the client may follow.
    pub action_url: Option<String>,
    /// Free-form extra payload.
    pub metadata: Value,
}

impl NewNotification {
    /// Build a notification with no action link or metadata.
    pub fn plain(
        user: TelegramId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user,
            kind,
            title: title.into(),
            message: message.into(),
            action_url: None,
            metadata: Value::Null,
        }
    }
}

/// Write a notification, logging and swallowing any store failure.
pub(crate) async fn notify_quietly<N>(repo: &N, notification: NewNotification)
where
    N: NotificationRepository + ?Sized,
{
    let user = notification.user.clone();
    let title = notification.title.clone();
    if let Err(error) = repo.insert(&notification).await {
        tracing::warn!(%user, title, %error, "failed to write notification");
    }
}
