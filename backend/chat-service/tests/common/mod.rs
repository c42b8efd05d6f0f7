#![allow(dead_code)]

//! In-memory fakes for the store and collaborator seams, plus a harness
//! wiring them into real services. Lets the delivery pipeline run
//! end-to-end in-process: real presence registry, real fanout, fake
//! persistence.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use uuid::Uuid;

use chat_service::clients::{AssetStore, PostDirectory, ProfileDirectory};
use chat_service::error::AppError;
use chat_service::models::{
    Conversation, LastMessage, Message, NewMessage, NewNotification, Notification,
    ParticipantPair, PostSummary, PublicProfile,
};
use chat_service::presence::PresenceRegistry;
use chat_service::services::{ChatService, EventFanout, NotificationService};
use chat_service::store::{ConversationStore, MessageStore, NotificationStore};
use chat_service::ws::events::ChatEvent;

#[derive(Default)]
pub struct MemoryConversationStore {
    rows: Mutex<Vec<Conversation>>,
}

impl MemoryConversationStore {
    pub fn snapshot(&self) -> Vec<Conversation> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn find_or_create(
        &self,
        pair: ParticipantPair,
        seed: LastMessage,
    ) -> Result<Conversation, AppError> {
        // The lock is held across lookup and insert, mirroring the unique
        // constraint: concurrent creates collapse onto one row.
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter().find(|c| c.participants == pair) {
            return Ok(existing.clone());
        }
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            participants: pair,
            last_message: seed,
            created_at: now,
            updated_at: now,
        };
        rows.push(conversation.clone());
        Ok(conversation)
    }

    async fn find_by_pair(&self, pair: ParticipantPair) -> Result<Option<Conversation>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|c| c.participants == pair).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Conversation>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|c| c.id == id).cloned())
    }

    async fn update_last_message(&self, id: Uuid, last: LastMessage) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|c| c.id == id) {
            row.last_message = last;
            row.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_last_message_seen(&self, id: Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|c| c.id == id) {
            row.last_message.seen = true;
        }
        Ok(())
    }

    async fn list_for_participant(&self, user_id: Uuid) -> Result<Vec<Conversation>, AppError> {
        let rows = self.rows.lock().unwrap();
        let mut result: Vec<Conversation> = rows
            .iter()
            .filter(|c| c.participants.contains(user_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(result)
    }
}

#[derive(Default)]
pub struct MemoryMessageStore {
    rows: Mutex<Vec<Message>>,
}

impl MemoryMessageStore {
    pub fn snapshot(&self) -> Vec<Message> {
        self.rows.lock().unwrap().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Message> {
        self.rows.lock().unwrap().iter().find(|m| m.id == id).cloned()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn append(&self, message: NewMessage) -> Result<Message, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = Message {
            id: Uuid::new_v4(),
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            text: message.text,
            img: message.img,
            shared_post_id: message.shared_post_id,
            seen: false,
            deleted: false,
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Message>, AppError> {
        Ok(self.get(id))
    }

    async fn list_for_conversation(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>, AppError> {
        let rows = self.rows.lock().unwrap();
        // Insertion order is creation order, which is what the contract
        // promises (oldest first).
        Ok(rows
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn mark_seen(&self, conversation_id: Uuid) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let mut flipped = 0;
        for row in rows
            .iter_mut()
            .filter(|m| m.conversation_id == conversation_id && !m.seen)
        {
            row.seen = true;
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn apply_tombstone(&self, message_id: Uuid, tombstone: &str) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or(AppError::NotFound("message"))?;
        row.text = tombstone.to_string();
        row.img = None;
        row.shared_post_id = None;
        row.deleted = true;
        Ok(())
    }

    async fn delete_all(&self, conversation_id: Uuid) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.conversation_id != conversation_id);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryNotificationStore {
    rows: Mutex<Vec<Notification>>,
}

impl MemoryNotificationStore {
    pub fn snapshot(&self) -> Vec<Notification> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, notification: NewNotification) -> Result<Notification, AppError> {
        let row = Notification {
            id: Uuid::new_v4(),
            recipient_id: notification.recipient_id,
            sender_id: notification.sender_id,
            kind: notification.kind,
            text: notification.text,
            post_id: notification.post_id,
            message_id: notification.message_id,
            read: false,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|n| n.id == id).cloned())
    }

    async fn list_for_recipient(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let rows = self.rows.lock().unwrap();
        // Reverse insertion order stands in for created_at DESC; fake
        // timestamps can collide within a test run.
        Ok(rows
            .iter()
            .rev()
            .filter(|n| n.recipient_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|n| n.recipient_id == user_id && !n.read)
            .count() as i64)
    }

    async fn mark_read(&self, id: Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|n| n.id == id) {
            row.read = true;
        }
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let mut flipped = 0;
        for row in rows
            .iter_mut()
            .filter(|n| n.recipient_id == user_id && !n.read)
        {
            row.read = true;
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn delete_all_for_recipient(&self, user_id: Uuid) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| n.recipient_id != user_id);
        Ok((before - rows.len()) as u64)
    }
}

/// Records every delete, optionally failing for configured URIs.
#[derive(Default)]
pub struct RecordingAssetStore {
    deleted: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingAssetStore {
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn fail_for(&self, uri: &str) {
        self.failing.lock().unwrap().insert(uri.to_string());
    }
}

#[async_trait]
impl AssetStore for RecordingAssetStore {
    async fn delete_asset(&self, uri: &str) -> Result<bool, AppError> {
        if self.failing.lock().unwrap().contains(uri) {
            return Err(AppError::UpstreamAsset("asset service unavailable".into()));
        }
        self.deleted.lock().unwrap().push(uri.to_string());
        Ok(true)
    }
}

/// Serves profiles registered by the test; errors for unknown users so the
/// degradation path gets exercised too.
#[derive(Default)]
pub struct FakeProfiles {
    profiles: Mutex<HashMap<Uuid, PublicProfile>>,
}

impl FakeProfiles {
    pub fn add(&self, user_id: Uuid, username: &str) {
        self.profiles.lock().unwrap().insert(
            user_id,
            PublicProfile {
                id: user_id,
                username: username.to_string(),
                profile_pic: format!("https://cdn.example/{username}.png"),
                name: username.to_string(),
            },
        );
    }
}

#[async_trait]
impl ProfileDirectory for FakeProfiles {
    async fn get_public_profile(&self, user_id: Uuid) -> Result<PublicProfile, AppError> {
        self.profiles
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or(AppError::Internal)
    }
}

#[derive(Default)]
pub struct FakePosts {
    posts: Mutex<HashMap<Uuid, PostSummary>>,
}

impl FakePosts {
    pub fn add(&self, post: PostSummary) {
        self.posts.lock().unwrap().insert(post.id, post);
    }
}

#[async_trait]
impl PostDirectory for FakePosts {
    async fn get_post_summary(&self, post_id: Uuid) -> Result<Option<PostSummary>, AppError> {
        Ok(self.posts.lock().unwrap().get(&post_id).cloned())
    }
}

/// Real services over fake persistence.
pub struct TestHarness {
    pub registry: PresenceRegistry,
    pub fanout: EventFanout,
    pub chat: Arc<ChatService>,
    pub notifications: Arc<NotificationService>,
    pub conversations: Arc<MemoryConversationStore>,
    pub messages: Arc<MemoryMessageStore>,
    pub notification_store: Arc<MemoryNotificationStore>,
    pub assets: Arc<RecordingAssetStore>,
    pub profiles: Arc<FakeProfiles>,
    pub posts: Arc<FakePosts>,
}

impl TestHarness {
    pub fn new() -> Self {
        let registry = PresenceRegistry::new();
        let fanout = EventFanout::new(registry.clone());
        let conversations = Arc::new(MemoryConversationStore::default());
        let messages = Arc::new(MemoryMessageStore::default());
        let notification_store = Arc::new(MemoryNotificationStore::default());
        let assets = Arc::new(RecordingAssetStore::default());
        let profiles = Arc::new(FakeProfiles::default());
        let posts = Arc::new(FakePosts::default());

        let notifications = Arc::new(NotificationService::new(
            notification_store.clone(),
            profiles.clone(),
            fanout.clone(),
        ));
        let chat = Arc::new(ChatService::new(
            conversations.clone(),
            messages.clone(),
            assets.clone(),
            profiles.clone(),
            posts.clone(),
            notifications.clone(),
            fanout.clone(),
        ));

        Self {
            registry,
            fanout,
            chat,
            notifications,
            conversations,
            messages,
            notification_store,
            assets,
            profiles,
            posts,
        }
    }

    /// Register a live connection for `user_id`, exactly as the socket
    /// handler does on connect (including the presence broadcast), and
    /// return the event stream that connection would observe.
    pub async fn connect(&self, user_id: Uuid) -> UnboundedReceiver<ChatEvent> {
        let (tx, rx) = unbounded_channel();
        self.registry.register(user_id, tx).await;
        self.fanout.broadcast_online_users().await;
        rx
    }
}

/// Drain everything currently queued on a connection.
pub fn drain(rx: &mut UnboundedReceiver<ChatEvent>) -> Vec<ChatEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Drain, keeping only non-presence events. Presence snapshots arrive on
/// every connect/disconnect and most tests do not care about them.
pub fn drain_domain_events(rx: &mut UnboundedReceiver<ChatEvent>) -> Vec<ChatEvent> {
    drain(rx)
        .into_iter()
        .filter(|e| !matches!(e, ChatEvent::OnlineUsers { .. }))
        .collect()
}
