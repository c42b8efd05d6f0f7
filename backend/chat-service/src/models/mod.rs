pub mod conversation;
pub mod message;
pub mod notification;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use conversation::{Conversation, ConversationView, LastMessage, ParticipantPair};
pub use message::{Message, MessageView, NewMessage};
pub use notification::{NewNotification, Notification, NotificationKind, NotificationView};

/// Public profile fields owned by the user service. Only the fields a chat
/// client renders next to a message or notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub profile_pic: String,
    pub name: String,
}

impl PublicProfile {
    /// Placeholder used when the user service cannot be reached. Keeps
    /// conversation/notification listings usable instead of failing them.
    pub fn unresolved(id: Uuid) -> Self {
        Self {
            id,
            username: String::new(),
            profile_pic: String::new(),
            name: String::new(),
        }
    }
}

/// Lightweight summary of a post owned by the post service, embedded in
/// message payloads when a post is shared into a chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Uuid,
    pub text: String,
    pub img: Option<String>,
    pub posted_by: Uuid,
    pub created_at: DateTime<Utc>,
}
