use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clients::{AssetStore, PostDirectory, ProfileDirectory};
use crate::error::AppError;
use crate::models::message::TOMBSTONE_TEXT;
use crate::models::{
    ConversationView, LastMessage, Message, MessageView, NewMessage, NotificationKind,
    ParticipantPair, PostSummary, PublicProfile,
};
use crate::services::fanout::EventFanout;
use crate::services::notification_service::NotificationService;
use crate::store::{ConversationStore, MessageStore};
use crate::ws::events::ChatEvent;

/// Send-message request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub recipient_id: Uuid,
    /// Message text; may be empty when an image or shared post carries the
    /// content.
    #[serde(default)]
    pub text: String,
    /// Resolved URI of an already-uploaded image. Uploading is the asset
    /// service's job; this core only ever stores and later releases the
    /// URI.
    pub img: Option<String>,
    pub shared_post_id: Option<Uuid>,
}

/// Orchestrates conversation and message state plus the event emissions
/// that keep connected clients in sync. Every mutation follows the same
/// shape: validate, write to the store, await the acknowledgement, then
/// best-effort push.
pub struct ChatService {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    assets: Arc<dyn AssetStore>,
    profiles: Arc<dyn ProfileDirectory>,
    posts: Arc<dyn PostDirectory>,
    notifications: Arc<NotificationService>,
    fanout: EventFanout,
}

impl ChatService {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
        assets: Arc<dyn AssetStore>,
        profiles: Arc<dyn ProfileDirectory>,
        posts: Arc<dyn PostDirectory>,
        notifications: Arc<NotificationService>,
        fanout: EventFanout,
    ) -> Self {
        Self {
            conversations,
            messages,
            assets,
            profiles,
            posts,
            notifications,
            fanout,
        }
    }

    pub async fn send_message(
        &self,
        sender_id: Uuid,
        request: SendMessage,
    ) -> Result<MessageView, AppError> {
        let pair = ParticipantPair::new(sender_id, request.recipient_id).ok_or_else(|| {
            AppError::Validation("sender and recipient must be distinct users".into())
        })?;

        if request.text.trim().is_empty()
            && request.img.is_none()
            && request.shared_post_id.is_none()
        {
            return Err(AppError::Validation("message payload is empty".into()));
        }

        let summary = LastMessage::from_send(&request.text, sender_id);
        let conversation = self
            .conversations
            .find_or_create(pair, summary.clone())
            .await?;

        let message = self
            .messages
            .append(NewMessage {
                conversation_id: conversation.id,
                sender_id,
                text: request.text.clone(),
                img: request.img.clone(),
                shared_post_id: request.shared_post_id,
            })
            .await?;

        self.conversations
            .update_last_message(conversation.id, summary)
            .await?;

        info!(
            message_id = %message.id,
            conversation_id = %conversation.id,
            %sender_id,
            "message sent"
        );

        let view = self.resolve_message(message).await;
        self.fanout
            .send_to_user(request.recipient_id, ChatEvent::NewMessage(view.clone()))
            .await;

        // The message itself is already durable; a failed notification
        // write must not fail the send.
        let text = self.notification_text(sender_id).await;
        if let Err(e) = self
            .notifications
            .notify(
                request.recipient_id,
                sender_id,
                NotificationKind::Message,
                text,
                None,
                Some(view.id),
            )
            .await
        {
            warn!(error = %e, message_id = %view.id, "message notification failed");
        }

        Ok(view)
    }

    /// Messages between the requester and `other_user_id`, oldest first,
    /// shared posts resolved.
    pub async fn list_messages(
        &self,
        requester_id: Uuid,
        other_user_id: Uuid,
    ) -> Result<Vec<MessageView>, AppError> {
        let pair = ParticipantPair::new(requester_id, other_user_id).ok_or_else(|| {
            AppError::Validation("cannot fetch a conversation with yourself".into())
        })?;

        let conversation = self
            .conversations
            .find_by_pair(pair)
            .await?
            .ok_or(AppError::NotFound("conversation"))?;

        let messages = self
            .messages
            .list_for_conversation(conversation.id)
            .await?;

        let mut views = Vec::with_capacity(messages.len());
        for message in messages {
            views.push(self.resolve_message(message).await);
        }
        Ok(views)
    }

    /// The requester's conversations, most recently active first. The
    /// requester is stripped from the participant list; the other side's
    /// public profile is populated.
    pub async fn list_conversations(
        &self,
        requester_id: Uuid,
    ) -> Result<Vec<ConversationView>, AppError> {
        let conversations = self
            .conversations
            .list_for_participant(requester_id)
            .await?;

        let mut views = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let Some(other) = conversation.participants.other(requester_id) else {
                continue;
            };
            let profile = self.resolve_profile(other).await;
            views.push(ConversationView::new(conversation, profile));
        }
        Ok(views)
    }

    /// Sender-only soft delete: the message keeps its slot in the history
    /// as a tombstone. Terminal; repeating the delete is a no-op.
    pub async fn delete_message(
        &self,
        requester_id: Uuid,
        message_id: Uuid,
    ) -> Result<(), AppError> {
        let message = self
            .messages
            .find_by_id(message_id)
            .await?
            .ok_or(AppError::NotFound("message"))?;

        if message.sender_id != requester_id {
            return Err(AppError::Forbidden(
                "you can only delete your own messages".into(),
            ));
        }

        if message.deleted {
            return Ok(());
        }

        if let Some(img) = &message.img {
            self.release_asset(img).await;
        }

        self.messages
            .apply_tombstone(message_id, TOMBSTONE_TEXT)
            .await?;

        info!(%message_id, %requester_id, "message soft-deleted");

        if let Some(conversation) = self.conversations.find_by_id(message.conversation_id).await? {
            if let Some(other) = conversation.participants.other(requester_id) {
                self.fanout
                    .send_to_user(
                        other,
                        ChatEvent::MessageDeleted {
                            message_id,
                            is_deleted: true,
                        },
                    )
                    .await;
            }
        }

        Ok(())
    }

    /// The one true hard-delete path: wipes every message row, releases
    /// every attached image asset and resets the conversation's
    /// last-message snapshot. Irreversible by design, unlike per-message
    /// soft delete.
    pub async fn clear_conversation(
        &self,
        requester_id: Uuid,
        other_user_id: Uuid,
    ) -> Result<(), AppError> {
        let pair = ParticipantPair::new(requester_id, other_user_id).ok_or_else(|| {
            AppError::Validation("cannot clear a conversation with yourself".into())
        })?;

        let conversation = self
            .conversations
            .find_by_pair(pair)
            .await?
            .ok_or(AppError::NotFound("conversation"))?;

        let messages = self
            .messages
            .list_for_conversation(conversation.id)
            .await?;
        for message in &messages {
            if let Some(img) = &message.img {
                self.release_asset(img).await;
            }
        }

        let removed = self.messages.delete_all(conversation.id).await?;
        self.conversations
            .update_last_message(conversation.id, LastMessage::empty())
            .await?;

        info!(
            conversation_id = %conversation.id,
            %requester_id,
            removed,
            "conversation cleared"
        );

        self.fanout
            .send_to_user(
                other_user_id,
                ChatEvent::ChatCleared {
                    conversation_id: conversation.id,
                },
            )
            .await;

        Ok(())
    }

    /// Flip every unseen message and the conversation's last-message seen
    /// flag, then tell `notify_user_id` (the other participant, whose
    /// messages were just read) if they are online. Idempotent: a repeat
    /// call flips nothing and emits at most one more event.
    pub async fn mark_conversation_seen(
        &self,
        conversation_id: Uuid,
        notify_user_id: Uuid,
    ) -> Result<(), AppError> {
        self.messages.mark_seen(conversation_id).await?;
        self.conversations
            .set_last_message_seen(conversation_id)
            .await?;

        self.fanout
            .send_to_user(notify_user_id, ChatEvent::MessagesSeen { conversation_id })
            .await;

        Ok(())
    }

    async fn resolve_message(&self, message: Message) -> MessageView {
        let shared_post = match message.shared_post_id {
            Some(post_id) => self.resolve_post(post_id).await,
            None => None,
        };
        MessageView::new(message, shared_post)
    }

    async fn resolve_post(&self, post_id: Uuid) -> Option<PostSummary> {
        match self.posts.get_post_summary(post_id).await {
            Ok(summary) => summary,
            Err(_) => {
                warn!(%post_id, "shared post unresolved");
                None
            }
        }
    }

    async fn resolve_profile(&self, user_id: Uuid) -> PublicProfile {
        match self.profiles.get_public_profile(user_id).await {
            Ok(profile) => profile,
            Err(_) => {
                warn!(%user_id, "profile unresolved, using placeholder");
                PublicProfile::unresolved(user_id)
            }
        }
    }

    async fn notification_text(&self, sender_id: Uuid) -> String {
        match self.profiles.get_public_profile(sender_id).await {
            Ok(profile) if !profile.username.is_empty() => {
                format!("{} sent you a message", profile.username)
            }
            _ => "You have a new message".to_string(),
        }
    }

    /// Asset release is best-effort: an orphaned asset is preferable to a
    /// deletion the user can see failing.
    async fn release_asset(&self, uri: &str) {
        match self.assets.delete_asset(uri).await {
            Ok(true) => {}
            Ok(false) => warn!(%uri, "asset already gone"),
            Err(e) => warn!(error = %e, %uri, "asset release failed"),
        }
    }
}
