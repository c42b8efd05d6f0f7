use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PublicProfile;

/// Notification type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// User liked a post
    Like,
    /// User replied to a post
    Reply,
    /// User started following
    Follow,
    /// Direct message
    Message,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Reply => "reply",
            NotificationKind::Follow => "follow",
            NotificationKind::Message => "message",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "like" => Some(NotificationKind::Like),
            "reply" => Some(NotificationKind::Reply),
            "follow" => Some(NotificationKind::Follow),
            "message" => Some(NotificationKind::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub kind: NotificationKind,
    pub text: String,
    pub post_id: Option<Uuid>,
    pub message_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub kind: NotificationKind,
    pub text: String,
    pub post_id: Option<Uuid>,
    pub message_id: Option<Uuid>,
}

/// Notification as pushed to clients, sender resolved to a public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender: PublicProfile,
    pub kind: NotificationKind,
    pub text: String,
    pub post_id: Option<Uuid>,
    pub message_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationView {
    pub fn new(notification: Notification, sender: PublicProfile) -> Self {
        Self {
            id: notification.id,
            recipient_id: notification.recipient_id,
            sender,
            kind: notification.kind,
            text: notification.text,
            post_id: notification.post_id,
            message_id: notification.message_id,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}
