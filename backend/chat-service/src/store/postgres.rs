use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Conversation, LastMessage, Message, NewMessage, NewNotification, Notification,
    NotificationKind, ParticipantPair,
};
use crate::store::{ConversationStore, MessageStore, NotificationStore};

const CONVERSATION_COLUMNS: &str = "id, user_a, user_b, last_message_text, last_message_sender, last_message_seen, created_at, updated_at";
const MESSAGE_COLUMNS: &str =
    "id, conversation_id, sender_id, text, img, shared_post_id, seen, deleted, created_at";
const NOTIFICATION_COLUMNS: &str =
    "id, recipient_id, sender_id, kind, text, post_id, message_id, read, created_at";

fn conversation_from_row(row: &PgRow) -> Result<Conversation, AppError> {
    let user_a: Uuid = row.get("user_a");
    let user_b: Uuid = row.get("user_b");
    // The pair CHECK constraint makes a degenerate row impossible; a miss
    // here means the table was tampered with outside the service.
    let participants = ParticipantPair::new(user_a, user_b).ok_or(AppError::Internal)?;

    Ok(Conversation {
        id: row.get("id"),
        participants,
        last_message: LastMessage {
            text: row.get("last_message_text"),
            sender: row.get("last_message_sender"),
            seen: row.get("last_message_seen"),
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn message_from_row(row: &PgRow) -> Message {
    Message {
        id: row.get("id"),
        conversation_id: row.get("conversation_id"),
        sender_id: row.get("sender_id"),
        text: row.get("text"),
        img: row.get("img"),
        shared_post_id: row.get("shared_post_id"),
        seen: row.get("seen"),
        deleted: row.get("deleted"),
        created_at: row.get("created_at"),
    }
}

fn notification_from_row(row: &PgRow) -> Notification {
    let kind: String = row.get("kind");
    Notification {
        id: row.get("id"),
        recipient_id: row.get("recipient_id"),
        sender_id: row.get("sender_id"),
        // The column only ever holds values written through NotificationKind
        kind: NotificationKind::from_str(&kind).unwrap_or(NotificationKind::Message),
        text: row.get("text"),
        post_id: row.get("post_id"),
        message_id: row.get("message_id"),
        read: row.get("read"),
        created_at: row.get("created_at"),
    }
}

#[derive(Clone)]
pub struct PgConversationStore {
    db: Pool<Postgres>,
}

impl PgConversationStore {
    pub fn new(db: Pool<Postgres>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn find_or_create(
        &self,
        pair: ParticipantPair,
        seed: LastMessage,
    ) -> Result<Conversation, AppError> {
        // Creation races for the same pair collapse onto the unique
        // constraint; the loser's insert is a no-op and the re-select below
        // observes the winner's row.
        sqlx::query(
            "INSERT INTO conversations (id, user_a, user_b, last_message_text, last_message_sender, last_message_seen) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_a, user_b) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(pair.user_a())
        .bind(pair.user_b())
        .bind(&seed.text)
        .bind(seed.sender)
        .bind(seed.seen)
        .execute(&self.db)
        .await?;

        self.find_by_pair(pair)
            .await?
            .ok_or(AppError::NotFound("conversation"))
    }

    async fn find_by_pair(&self, pair: ParticipantPair) -> Result<Option<Conversation>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE user_a = $1 AND user_b = $2",
        ))
        .bind(pair.user_a())
        .bind(pair.user_b())
        .fetch_optional(&self.db)
        .await?;

        row.as_ref().map(conversation_from_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Conversation>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.as_ref().map(conversation_from_row).transpose()
    }

    async fn update_last_message(&self, id: Uuid, last: LastMessage) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE conversations \
             SET last_message_text = $2, last_message_sender = $3, last_message_seen = $4, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&last.text)
        .bind(last.sender)
        .bind(last.seen)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn set_last_message_seen(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE conversations SET last_message_seen = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn list_for_participant(&self, user_id: Uuid) -> Result<Vec<Conversation>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations \
             WHERE user_a = $1 OR user_b = $1 \
             ORDER BY updated_at DESC",
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        rows.iter().map(conversation_from_row).collect()
    }
}

#[derive(Clone)]
pub struct PgMessageStore {
    db: Pool<Postgres>,
}

impl PgMessageStore {
    pub fn new(db: Pool<Postgres>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn append(&self, message: NewMessage) -> Result<Message, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO messages (id, conversation_id, sender_id, text, img, shared_post_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {MESSAGE_COLUMNS}",
        ))
        .bind(Uuid::new_v4())
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.text)
        .bind(&message.img)
        .bind(message.shared_post_id)
        .fetch_one(&self.db)
        .await?;

        Ok(message_from_row(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.as_ref().map(message_from_row))
    }

    async fn list_for_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE conversation_id = $1 \
             ORDER BY created_at ASC",
        ))
        .bind(conversation_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.iter().map(message_from_row).collect())
    }

    async fn mark_seen(&self, conversation_id: Uuid) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE messages SET seen = TRUE WHERE conversation_id = $1 AND seen = FALSE")
                .bind(conversation_id)
                .execute(&self.db)
                .await?;
        Ok(result.rows_affected())
    }

    async fn apply_tombstone(&self, message_id: Uuid, tombstone: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE messages \
             SET text = $2, img = NULL, shared_post_id = NULL, deleted = TRUE \
             WHERE id = $1",
        )
        .bind(message_id)
        .bind(tombstone)
        .execute(&self.db)
        .await?;

        // Row gone means a conversation clear won the race; surface the
        // not-found kind rather than pretending the tombstone landed.
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("message"));
        }
        Ok(())
    }

    async fn delete_all(&self, conversation_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM messages WHERE conversation_id = $1")
            .bind(conversation_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PgNotificationStore {
    db: Pool<Postgres>,
}

impl PgNotificationStore {
    pub fn new(db: Pool<Postgres>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn insert(&self, notification: NewNotification) -> Result<Notification, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO notifications (id, recipient_id, sender_id, kind, text, post_id, message_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {NOTIFICATION_COLUMNS}",
        ))
        .bind(Uuid::new_v4())
        .bind(notification.recipient_id)
        .bind(notification.sender_id)
        .bind(notification.kind.as_str())
        .bind(&notification.text)
        .bind(notification.post_id)
        .bind(notification.message_id)
        .fetch_one(&self.db)
        .await?;

        Ok(notification_from_row(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.as_ref().map(notification_from_row))
    }

    async fn list_for_recipient(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE recipient_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2",
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.iter().map(notification_from_row).collect())
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)::bigint FROM notifications WHERE recipient_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    async fn mark_read(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE recipient_id = $1 AND read = FALSE")
                .bind(user_id)
                .execute(&self.db)
                .await?;
        Ok(result.rows_affected())
    }

    async fn delete_all_for_recipient(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE recipient_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
