use crate::middleware::identity;
use crate::state::AppState;
use crate::ws::handlers::ws_handler;
use axum::routing::{delete, get, post, put};
use axum::Router;

pub mod messages;
pub mod notifications;

use messages::{
    clear_conversation, delete_message, get_conversations, get_messages, send_message,
};
use notifications::{
    clear_all_notifications, create_notification, get_notifications, get_unread_count,
    mark_all_as_read, mark_as_read,
};

pub fn build_router(state: AppState) -> Router {
    let api_v1 = Router::new()
        // Direct messages
        .route("/messages/conversations", get(get_conversations))
        .route("/messages", post(send_message))
        .route("/messages/clear/:other_user_id", delete(clear_conversation))
        // GET takes the other participant's id, DELETE a message id
        .route("/messages/:id", get(get_messages).delete(delete_message))
        // Notifications
        .route(
            "/notifications",
            get(get_notifications).post(create_notification),
        )
        .route("/notifications/unread", get(get_unread_count))
        .route("/notifications/mark-read/:notification_id", put(mark_as_read))
        .route("/notifications/mark-all-read", put(mark_all_as_read))
        .route("/notifications/clear-all", delete(clear_all_notifications))
        // Live events
        .route("/ws", get(ws_handler))
        .route_layer(axum::middleware::from_fn(identity::identity_middleware));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/v1", api_v1)
        .with_state(state)
}
