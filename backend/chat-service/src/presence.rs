//! Live mapping from user id to their active socket.
//!
//! One binding per user: a second connection for the same user overwrites
//! the first (last-connect wins). The connection id returned by
//! [`PresenceRegistry::register`] lets the stale socket's disconnect
//! cleanup prove it still owns the binding before removing it, so an
//! overwritten connection can never evict its successor.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::ws::events::ChatEvent;

pub type EventSender = UnboundedSender<ChatEvent>;

struct Binding {
    connection_id: Uuid,
    sender: EventSender,
}

#[derive(Default, Clone)]
pub struct PresenceRegistry {
    inner: Arc<RwLock<HashMap<Uuid, Binding>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a user to a live connection, replacing any prior binding.
    /// Returns the connection id to pass back to [`unregister`].
    ///
    /// [`unregister`]: PresenceRegistry::unregister
    pub async fn register(&self, user_id: Uuid, sender: EventSender) -> Uuid {
        let connection_id = Uuid::new_v4();
        let mut guard = self.inner.write().await;
        guard.insert(
            user_id,
            Binding {
                connection_id,
                sender,
            },
        );
        connection_id
    }

    /// Remove the binding if `connection_id` still owns it. Idempotent:
    /// absent or already-replaced bindings are left untouched. Returns
    /// whether a binding was removed.
    pub async fn unregister(&self, user_id: Uuid, connection_id: Uuid) -> bool {
        let mut guard = self.inner.write().await;
        match guard.get(&user_id) {
            Some(binding) if binding.connection_id == connection_id => {
                guard.remove(&user_id);
                true
            }
            _ => false,
        }
    }

    pub async fn lookup(&self, user_id: Uuid) -> Option<EventSender> {
        let guard = self.inner.read().await;
        guard.get(&user_id).map(|binding| binding.sender.clone())
    }

    pub async fn online_user_ids(&self) -> Vec<Uuid> {
        let guard = self.inner.read().await;
        guard.keys().copied().collect()
    }

    /// Senders for every registered connection, for registry-wide
    /// broadcasts.
    pub async fn senders(&self) -> Vec<EventSender> {
        let guard = self.inner.read().await;
        guard.values().map(|binding| binding.sender.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn register_overwrites_prior_binding() {
        let registry = PresenceRegistry::new();
        let user = Uuid::new_v4();
        let (tx1, mut rx1) = unbounded_channel();
        let (tx2, mut rx2) = unbounded_channel();

        registry.register(user, tx1).await;
        registry.register(user, tx2).await;

        let sender = registry.lookup(user).await.expect("user should be online");
        sender
            .send(ChatEvent::MessagesSeen {
                conversation_id: Uuid::new_v4(),
            })
            .unwrap();

        assert!(rx2.recv().await.is_some());
        // First channel was dropped when its binding was replaced.
        assert!(rx1.recv().await.is_none());
    }

    #[tokio::test]
    async fn stale_unregister_keeps_new_binding() {
        let registry = PresenceRegistry::new();
        let user = Uuid::new_v4();
        let (tx1, _rx1) = unbounded_channel();
        let (tx2, _rx2) = unbounded_channel();

        let first = registry.register(user, tx1).await;
        let second = registry.register(user, tx2).await;

        assert!(!registry.unregister(user, first).await);
        assert!(registry.lookup(user).await.is_some());

        assert!(registry.unregister(user, second).await);
        assert!(registry.lookup(user).await.is_none());
    }

    #[tokio::test]
    async fn unregister_is_idempotent() {
        let registry = PresenceRegistry::new();
        let user = Uuid::new_v4();
        let (tx, _rx) = unbounded_channel();

        let conn = registry.register(user, tx).await;
        assert!(registry.unregister(user, conn).await);
        assert!(!registry.unregister(user, conn).await);
    }

    #[tokio::test]
    async fn online_user_ids_reflects_bindings() {
        let registry = PresenceRegistry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let (tx_a, _rx_a) = unbounded_channel();
        let (tx_b, _rx_b) = unbounded_channel();

        registry.register(a, tx_a).await;
        let conn_b = registry.register(b, tx_b).await;

        let mut online = registry.online_user_ids().await;
        online.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(online, expected);

        registry.unregister(b, conn_b).await;
        assert_eq!(registry.online_user_ids().await, vec![a]);
    }
}
