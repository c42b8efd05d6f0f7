//! The socket protocol as a closed set of tagged event variants.
//!
//! Everything the server can push and everything a client can send is
//! enumerated here; the read loop in [`handlers`](super::handlers) has the
//! single dispatch point. Wire names are part of the client contract and
//! never change casually.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{MessageView, NotificationView};

/// Server-to-client events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChatEvent {
    /// A message was just persisted for the recipient.
    #[serde(rename = "newMessage")]
    NewMessage(MessageView),

    /// The sender soft-deleted a message the recipient may be displaying.
    #[serde(rename = "messageDeleted")]
    #[serde(rename_all = "camelCase")]
    MessageDeleted { message_id: Uuid, is_deleted: bool },

    /// The other participant read everything in the conversation.
    #[serde(rename = "messagesSeen")]
    #[serde(rename_all = "camelCase")]
    MessagesSeen { conversation_id: Uuid },

    /// The other participant wiped the conversation's history.
    #[serde(rename = "chatCleared")]
    #[serde(rename_all = "camelCase")]
    ChatCleared { conversation_id: Uuid },

    /// A notification was just persisted for this user.
    #[serde(rename = "newNotification")]
    NewNotification(NotificationView),

    /// Presence snapshot, broadcast on every registry change.
    #[serde(rename = "getOnlineUsers")]
    #[serde(rename_all = "camelCase")]
    OnlineUsers { user_ids: Vec<Uuid> },
}

/// Client-to-server events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// The connected user read the conversation; `user_id` is the other
    /// participant, who gets the `messagesSeen` push.
    #[serde(rename = "markMessagesAsSeen")]
    #[serde(rename_all = "camelCase")]
    MarkMessagesAsSeen {
        conversation_id: Uuid,
        user_id: Uuid,
    },

    /// Relay sent by the deleting client after its HTTP delete succeeds, so
    /// the server forwards the deletion to the other participant.
    #[serde(rename = "messageDeleted")]
    #[serde(rename_all = "camelCase")]
    MessageDeleted {
        message_id: Uuid,
        recipient_id: Uuid,
    },
}
