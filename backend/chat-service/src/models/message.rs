use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PostSummary;

/// Replacement text written over a soft-deleted message.
pub const TOMBSTONE_TEXT: &str = "This message was deleted";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub text: String,
    pub img: Option<String>,
    pub shared_post_id: Option<Uuid>,
    pub seen: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new message. Validation (non-empty payload, distinct
/// participants) happens in the service layer before this is constructed.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub text: String,
    pub img: Option<String>,
    pub shared_post_id: Option<Uuid>,
}

/// Message as pushed to clients, with any shared post reference resolved to
/// its lightweight summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub text: String,
    pub img: Option<String>,
    pub shared_post: Option<PostSummary>,
    pub seen: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl MessageView {
    pub fn new(message: Message, shared_post: Option<PostSummary>) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            text: message.text,
            img: message.img,
            shared_post,
            seen: message.seen,
            deleted: message.deleted,
            created_at: message.created_at,
        }
    }
}
