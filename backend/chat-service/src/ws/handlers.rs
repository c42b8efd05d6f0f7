use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc::unbounded_channel;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::state::AppState;
use crate::ws::events::{ChatEvent, ClientEvent};

#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// User id from the connection handshake. Web clients send the literal
    /// string "undefined" when nobody is logged in; that connection gets no
    /// presence registration but stays open.
    pub user_id: Option<String>,
}

fn parse_user_id(raw: Option<&str>) -> Option<Uuid> {
    let raw = raw?;
    if raw.is_empty() || raw == "undefined" {
        return None;
    }
    Uuid::parse_str(raw).ok()
}

pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, params, socket))
}

async fn handle_socket(state: AppState, params: WsParams, socket: WebSocket) {
    let user_id = parse_user_id(params.user_id.as_deref());
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Register presence before anything else so the connect broadcast and
    // any immediately-following sends observe this connection.
    let (tx, mut rx) = unbounded_channel::<ChatEvent>();
    let registration = match user_id {
        Some(uid) => {
            let connection_id = state.registry.register(uid, tx).await;
            state.fanout.broadcast_online_users().await;
            info!(user_id = %uid, "user connected");
            Some((uid, connection_id))
        }
        None => None,
    };

    // Pump queued events out to the socket. Ends when the registry binding
    // is replaced (sender dropped) or the socket goes away.
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!(error = %e, "failed to serialize outbound event");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(incoming) = ws_receiver.next().await {
        match incoming {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => dispatch_client_event(&state, event).await,
                Err(_) => warn!("ignoring unrecognized client event"),
            },
            Ok(Message::Close(_)) | Err(_) => break,
            // Ping/pong handled by the framework; binary frames are not
            // part of the protocol.
            Ok(_) => {}
        }
    }

    send_task.abort();

    // Disconnect always cleans up presence, but only if this connection
    // still owns the binding: a reconnect may have replaced it already.
    if let Some((uid, connection_id)) = registration {
        if state.registry.unregister(uid, connection_id).await {
            state.fanout.broadcast_online_users().await;
        }
        info!(user_id = %uid, "user disconnected");
    }
}

/// The single dispatch point for the closed set of client events.
async fn dispatch_client_event(state: &AppState, event: ClientEvent) {
    match event {
        ClientEvent::MarkMessagesAsSeen {
            conversation_id,
            user_id,
        } => {
            if let Err(e) = state
                .chat
                .mark_conversation_seen(conversation_id, user_id)
                .await
            {
                error!(error = %e, %conversation_id, "failed to mark messages as seen");
            }
        }
        // Pure relay: the deletion itself already happened over HTTP; this
        // only forwards the event to the other participant if online.
        ClientEvent::MessageDeleted {
            message_id,
            recipient_id,
        } => {
            state
                .fanout
                .send_to_user(
                    recipient_id,
                    ChatEvent::MessageDeleted {
                        message_id,
                        is_deleted: true,
                    },
                )
                .await;
        }
    }
}
