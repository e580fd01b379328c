//! Notification record types shared across the store, transports and API.

use serde::{Deserialize, Serialize};

/// Kind of server-generated notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A new chat message.
    Message,
    /// A group membership invite.
    Invite,
    /// A new intent was posted.
    Intent,
}

/// A single notification record as delivered by the server.
///
/// `id` is server-assigned and is the dedup key; `created_at` is carried
/// verbatim and never parsed locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    pub read: bool,
    pub created_at: String,
}

/// Payload for creating a notification server-side.
///
/// When `target_user_id` is set and differs from the local user, the created
/// record is not surfaced locally.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub group_id: Option<String>,
    pub target_user_id: Option<String>,
}

impl NewNotification {
    /// Creates a payload with no group and no explicit recipient.
    pub fn new(kind: NotificationKind, title: &str, message: &str) -> Self {
        NewNotification {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            group_id: None,
            target_user_id: None,
        }
    }

    /// Scopes the notification to a group.
    pub fn with_group(mut self, group_id: &str) -> Self {
        self.group_id = Some(group_id.to_string());
        self
    }

    /// Addresses the notification to a specific user.
    pub fn with_target(mut self, target_user_id: &str) -> Self {
        self.target_user_id = Some(target_user_id.to_string());
        self
    }
}
