use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::identity::RequesterId;
use crate::models::{NotificationKind, NotificationView};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(RequesterId(user_id)): Extension<RequesterId>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<NotificationView>>, AppError> {
    let notifications = state
        .notifications
        .list_for_recipient(user_id, params.limit)
        .await?;
    Ok(Json(notifications))
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

pub async fn get_unread_count(
    State(state): State<AppState>,
    Extension(RequesterId(user_id)): Extension<RequesterId>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let count = state.notifications.unread_count(user_id).await?;
    Ok(Json(UnreadCountResponse { count }))
}

pub async fn mark_as_read(
    State(state): State<AppState>,
    Extension(RequesterId(user_id)): Extension<RequesterId>,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .notifications
        .mark_read(user_id, notification_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_as_read(
    State(state): State<AppState>,
    Extension(RequesterId(user_id)): Extension<RequesterId>,
) -> Result<StatusCode, AppError> {
    state.notifications.mark_all_read(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_all_notifications(
    State(state): State<AppState>,
    Extension(RequesterId(user_id)): Extension<RequesterId>,
) -> Result<StatusCode, AppError> {
    state.notifications.clear_all(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ingestion endpoint for notification-worthy events raised by the
/// services that own posts and follows (like/reply/follow). The actor is
/// always the authenticated caller; message notifications are created
/// internally by the send path, not through here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub recipient_id: Uuid,
    pub kind: NotificationKind,
    pub text: String,
    pub post_id: Option<Uuid>,
    pub message_id: Option<Uuid>,
}

pub async fn create_notification(
    State(state): State<AppState>,
    Extension(RequesterId(actor_id)): Extension<RequesterId>,
    Json(body): Json<CreateNotificationRequest>,
) -> Result<Response, AppError> {
    let created = state
        .notifications
        .notify(
            body.recipient_id,
            actor_id,
            body.kind,
            body.text,
            body.post_id,
            body.message_id,
        )
        .await?;

    match created {
        Some(notification) => Ok((StatusCode::CREATED, Json(notification)).into_response()),
        // Self-action: suppressed by design.
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
