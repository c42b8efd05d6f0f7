//! Persistence seams for the messaging core.
//!
//! Services depend on these traits rather than on a concrete database so
//! the delivery pipeline can be exercised in tests with in-memory fakes.
//! The production implementations live in [`postgres`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Conversation, LastMessage, Message, NewMessage, NewNotification, Notification,
    ParticipantPair,
};

pub mod postgres;

pub use postgres::{PgConversationStore, PgMessageStore, PgNotificationStore};

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Look up the conversation for a pair, creating it with the given
    /// last-message seed if absent. Safe under concurrent calls for the
    /// same pair: at most one conversation per pair ever exists.
    async fn find_or_create(
        &self,
        pair: ParticipantPair,
        seed: LastMessage,
    ) -> Result<Conversation, AppError>;

    async fn find_by_pair(&self, pair: ParticipantPair) -> Result<Option<Conversation>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Conversation>, AppError>;

    /// Overwrite the embedded last-message snapshot.
    async fn update_last_message(&self, id: Uuid, last: LastMessage) -> Result<(), AppError>;

    /// Flip only the snapshot's seen flag. No-op when the conversation is
    /// gone; seen-marking must tolerate racing a clear.
    async fn set_last_message_seen(&self, id: Uuid) -> Result<(), AppError>;

    /// Conversations the user participates in, most recently updated first.
    async fn list_for_participant(&self, user_id: Uuid) -> Result<Vec<Conversation>, AppError>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn append(&self, message: NewMessage) -> Result<Message, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, AppError>;

    /// All messages in a conversation, oldest first.
    async fn list_for_conversation(&self, conversation_id: Uuid)
        -> Result<Vec<Message>, AppError>;

    /// Flip `seen` on every not-yet-seen message. Returns the number of
    /// rows flipped.
    async fn mark_seen(&self, conversation_id: Uuid) -> Result<u64, AppError>;

    /// Overwrite a message with its tombstone: replacement text, `img` and
    /// shared post cleared, `deleted` set. Fails with the not-found kind if
    /// the row no longer exists (e.g. a concurrent conversation clear).
    async fn apply_tombstone(&self, message_id: Uuid, tombstone: &str) -> Result<(), AppError>;

    /// Hard-delete every message in the conversation. Returns the number of
    /// rows removed.
    async fn delete_all(&self, conversation_id: Uuid) -> Result<u64, AppError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, notification: NewNotification) -> Result<Notification, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, AppError>;

    /// Newest first.
    async fn list_for_recipient(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError>;

    async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError>;

    async fn mark_read(&self, id: Uuid) -> Result<(), AppError>;

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError>;

    async fn delete_all_for_recipient(&self, user_id: Uuid) -> Result<u64, AppError>;
}
