//! Best-effort push delivery of domain events to connected recipients.
//!
//! At-most-once: an offline recipient, a connection that died between
//! lookup and send, or a full close race all result in a silent drop. The
//! recipient catches up from persisted state on its next fetch. Callers
//! must therefore only emit AFTER the corresponding store write has been
//! acknowledged; that ordering is what keeps connected clients consistent.

use tracing::debug;
use uuid::Uuid;

use crate::presence::PresenceRegistry;
use crate::ws::events::ChatEvent;

#[derive(Clone)]
pub struct EventFanout {
    registry: PresenceRegistry,
}

impl EventFanout {
    pub fn new(registry: PresenceRegistry) -> Self {
        Self { registry }
    }

    /// Push an event to one user if they are connected; drop it silently
    /// otherwise. Never fails: delivery outcome must not leak into the
    /// caller's HTTP response.
    pub async fn send_to_user(&self, user_id: Uuid, event: ChatEvent) {
        match self.registry.lookup(user_id).await {
            Some(sender) => {
                if sender.send(event).is_err() {
                    debug!(%user_id, "recipient disconnected mid-send, event dropped");
                }
            }
            None => {
                debug!(%user_id, "recipient offline, event dropped");
            }
        }
    }

    /// Emit the current online-user snapshot to every registered
    /// connection. Called after every presence change.
    pub async fn broadcast_online_users(&self) {
        let user_ids = self.registry.online_user_ids().await;
        let event = ChatEvent::OnlineUsers { user_ids };
        for sender in self.registry.senders().await {
            let _ = sender.send(event.clone());
        }
    }
}
