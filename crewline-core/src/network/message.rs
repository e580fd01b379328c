//! Wire Types
//!
//! Serde shapes for the notification REST endpoint and the push-stream
//! frames. The stream and notification records use camelCase field names;
//! REST mutation bodies use snake_case, matching the server contract.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::notifications::{Notification, NotificationKind};

/// One line-delimited frame from the push stream.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamFrame {
    /// A freshly created notification.
    Notification(NotificationFrame),
    /// Liveness keep-alive; carries nothing.
    Ping {},
    /// Informational connection acknowledgment.
    Connection {},
}

/// Payload of a `notification` stream frame.
///
/// The kind travels as `notificationType` because `type` tags the frame
/// itself. Stream deliveries are always unread.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFrame {
    pub id: String,
    pub notification_type: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub sender_id: Option<String>,
    pub created_at: String,
}

impl From<NotificationFrame> for Notification {
    fn from(frame: NotificationFrame) -> Self {
        Notification {
            id: frame.id,
            kind: frame.notification_type,
            title: frame.title,
            message: frame.message,
            group_id: frame.group_id,
            sender_id: frame.sender_id,
            read: false,
            created_at: frame.created_at,
        }
    }
}

/// `GET /api/notifications` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    pub notifications: Vec<Notification>,
}

/// `GET /api/notifications?counts=true` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct CountsResponse {
    pub counts: HashMap<String, HashMap<NotificationKind, u64>>,
}

/// `POST /api/notifications` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateResponse {
    pub notification: Notification,
}

/// `PUT` body marking one notification read.
#[derive(Debug, Serialize)]
pub(crate) struct MarkOneBody<'a> {
    pub notification_id: &'a str,
}

/// `PUT` body marking everything read.
#[derive(Debug, Serialize)]
pub(crate) struct MarkAllBody {
    pub action: &'static str,
}

impl MarkAllBody {
    pub fn new() -> Self {
        MarkAllBody {
            action: "mark_all_read",
        }
    }
}

/// `PUT` body marking a group (optionally one kind) read.
#[derive(Debug, Serialize)]
pub(crate) struct MarkGroupBody<'a> {
    pub action: &'static str,
    pub group_id: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NotificationKind>,
}

impl<'a> MarkGroupBody<'a> {
    pub fn new(group_id: &'a str, kind: Option<NotificationKind>) -> Self {
        MarkGroupBody {
            action: "mark_group_read",
            group_id,
            kind,
        }
    }
}

/// `POST` body creating a notification.
#[derive(Debug, Serialize)]
pub(crate) struct CreateBody<'a> {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: &'a str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_user_id: Option<&'a str>,
}
