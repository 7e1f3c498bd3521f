//! In-app notifications

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use docpulse_db::entities::{notification, prelude::*};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::events::time_ago;
use crate::middleware::AuthPrincipal;
use crate::models::*;
use crate::AppState;

/// List the caller's notifications, newest first (member only)
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications", body = NotificationList),
        (status = 403, description = "Not a member account", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
) -> Result<Json<NotificationList>, ApiError> {
    let m = principal.member()?;

    let rows = Notification::find()
        .filter(notification::Column::MemberId.eq(m.id))
        .order_by_desc(notification::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let unread_count = rows.iter().filter(|n| !n.read).count() as u64;

    let notifications: Vec<NotificationInfo> = rows
        .into_iter()
        .map(|n| NotificationInfo {
            id: n.id,
            title: n.kind.title().to_string(),
            message: n.message,
            kind: n.kind.to_value(),
            read: n.read,
            time_ago: time_ago(n.created_at),
            created_at: n.created_at,
        })
        .collect();

    let total = notifications.len();
    Ok(Json(NotificationList {
        notifications,
        unread_count,
        total,
    }))
}

/// Mark one of the caller's notifications as read (member only)
///
/// Another member's notification is indistinguishable from a missing one.
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked as read", body = NotificationInfo),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationInfo>, ApiError> {
    let m = principal.member()?;

    let n = Notification::find_by_id(id)
        .filter(notification::Column::MemberId.eq(m.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    let mut active = n.into_active_model();
    active.read = Set(true);
    let updated = active.update(&state.db).await?;

    Ok(Json(NotificationInfo {
        id: updated.id,
        title: updated.kind.title().to_string(),
        message: updated.message,
        kind: updated.kind.to_value(),
        read: updated.read,
        time_ago: time_ago(updated.created_at),
        created_at: updated.created_at,
    }))
}
