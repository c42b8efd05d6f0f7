use crate::presence::PresenceRegistry;
use crate::services::{ChatService, EventFanout, NotificationService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: PresenceRegistry,
    pub fanout: EventFanout,
    pub chat: Arc<ChatService>,
    pub notifications: Arc<NotificationService>,
}
