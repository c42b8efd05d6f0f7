use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::identity::RequesterId;
use crate::models::{ConversationView, MessageView};
use crate::services::SendMessage;
use crate::state::AppState;

pub async fn send_message(
    State(state): State<AppState>,
    Extension(RequesterId(user_id)): Extension<RequesterId>,
    Json(body): Json<SendMessage>,
) -> Result<(StatusCode, Json<MessageView>), AppError> {
    let message = state.chat.send_message(user_id, body).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Extension(RequesterId(user_id)): Extension<RequesterId>,
    Path(other_user_id): Path<Uuid>,
) -> Result<Json<Vec<MessageView>>, AppError> {
    let messages = state.chat.list_messages(user_id, other_user_id).await?;
    Ok(Json(messages))
}

pub async fn get_conversations(
    State(state): State<AppState>,
    Extension(RequesterId(user_id)): Extension<RequesterId>,
) -> Result<Json<Vec<ConversationView>>, AppError> {
    let conversations = state.chat.list_conversations(user_id).await?;
    Ok(Json(conversations))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Extension(RequesterId(user_id)): Extension<RequesterId>,
    Path(message_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.chat.delete_message(user_id, message_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_conversation(
    State(state): State<AppState>,
    Extension(RequesterId(user_id)): Extension<RequesterId>,
    Path(other_user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .chat
        .clear_conversation(user_id, other_user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
