use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PublicProfile;

/// The unordered pair of users anchoring a conversation, stored normalized
/// so `(A, B)` and `(B, A)` always map to the same row. The store layer
/// enforces `UNIQUE (user_a, user_b)` on top of this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantPair {
    user_a: Uuid,
    user_b: Uuid,
}

impl ParticipantPair {
    /// Returns `None` for a degenerate pair (a user cannot converse with
    /// themselves).
    pub fn new(a: Uuid, b: Uuid) -> Option<Self> {
        if a == b {
            return None;
        }
        if a < b {
            Some(Self { user_a: a, user_b: b })
        } else {
            Some(Self { user_a: b, user_b: a })
        }
    }

    pub fn user_a(&self) -> Uuid {
        self.user_a
    }

    pub fn user_b(&self) -> Uuid {
        self.user_b
    }

    pub fn contains(&self, user_id: Uuid) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }

    /// The participant that is not `user_id`, if `user_id` is in the pair.
    pub fn other(&self, user_id: Uuid) -> Option<Uuid> {
        if self.user_a == user_id {
            Some(self.user_b)
        } else if self.user_b == user_id {
            Some(self.user_a)
        } else {
            None
        }
    }
}

/// Embedded snapshot of the most recent message, denormalized onto the
/// conversation row so the conversation list renders without a join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub text: String,
    pub sender: Option<Uuid>,
    pub seen: bool,
}

impl LastMessage {
    pub fn from_send(text: &str, sender_id: Uuid) -> Self {
        Self {
            text: text.to_string(),
            sender: Some(sender_id),
            seen: false,
        }
    }

    /// The reset state after a conversation clear.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            sender: None,
            seen: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub participants: ParticipantPair,
    pub last_message: LastMessage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conversation as returned to a client: the requesting user is stripped
/// from the participant list and the other side's profile is populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub id: Uuid,
    pub participants: Vec<PublicProfile>,
    pub last_message: LastMessage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationView {
    pub fn new(conversation: Conversation, other: PublicProfile) -> Self {
        Self {
            id: conversation.id,
            participants: vec![other],
            last_message: conversation.last_message,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}
