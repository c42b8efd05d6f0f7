use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clients::ProfileDirectory;
use crate::error::AppError;
use crate::models::{
    NewNotification, Notification, NotificationKind, NotificationView, PublicProfile,
};
use crate::services::fanout::EventFanout;
use crate::store::NotificationStore;
use crate::ws::events::ChatEvent;

/// Hard ceiling on a single notification page.
const MAX_PAGE_SIZE: i64 = 50;

pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    profiles: Arc<dyn ProfileDirectory>,
    fanout: EventFanout,
}

impl NotificationService {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        profiles: Arc<dyn ProfileDirectory>,
        fanout: EventFanout,
    ) -> Self {
        Self {
            store,
            profiles,
            fanout,
        }
    }

    /// Persist a notification and attempt live delivery.
    ///
    /// Returns `None` without touching the store when the actor is the
    /// recipient: you never get notified about your own actions.
    pub async fn notify(
        &self,
        recipient_id: Uuid,
        actor_id: Uuid,
        kind: NotificationKind,
        text: String,
        post_id: Option<Uuid>,
        message_id: Option<Uuid>,
    ) -> Result<Option<Notification>, AppError> {
        if recipient_id == actor_id {
            return Ok(None);
        }

        let notification = self
            .store
            .insert(NewNotification {
                recipient_id,
                sender_id: actor_id,
                kind,
                text,
                post_id,
                message_id,
            })
            .await?;

        info!(%recipient_id, %actor_id, kind = kind.as_str(), "notification created");

        let sender = self.resolve_profile(actor_id).await;
        let view = NotificationView::new(notification.clone(), sender);
        self.fanout
            .send_to_user(recipient_id, ChatEvent::NewNotification(view))
            .await;

        Ok(Some(notification))
    }

    /// Newest first, sender profiles resolved, capped at 50 per page.
    pub async fn list_for_recipient(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<NotificationView>, AppError> {
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(MAX_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        let notifications = self.store.list_for_recipient(user_id, limit).await?;

        let mut views = Vec::with_capacity(notifications.len());
        for notification in notifications {
            let sender = self.resolve_profile(notification.sender_id).await;
            views.push(NotificationView::new(notification, sender));
        }
        Ok(views)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.store.unread_count(user_id).await
    }

    /// Idempotent; only the recipient may mark their notification read.
    pub async fn mark_read(&self, requester_id: Uuid, notification_id: Uuid) -> Result<(), AppError> {
        let notification = self
            .store
            .find_by_id(notification_id)
            .await?
            .ok_or(AppError::NotFound("notification"))?;

        if notification.recipient_id != requester_id {
            return Err(AppError::Forbidden(
                "you can only mark your own notifications as read".into(),
            ));
        }

        self.store.mark_read(notification_id).await
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<(), AppError> {
        self.store.mark_all_read(user_id).await?;
        Ok(())
    }

    pub async fn clear_all(&self, user_id: Uuid) -> Result<(), AppError> {
        let removed = self.store.delete_all_for_recipient(user_id).await?;
        info!(%user_id, removed, "notifications cleared");
        Ok(())
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
}
