//! Per-user notification inbox.

use api_types::notification::{MarkedRead, NotificationKind, NotificationList, NotificationView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Notification, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn notification_view(notification: Notification) -> NotificationView {
    NotificationView {
        id: notification.id,
        kind: match notification.kind {
            engine::NotificationKind::Announcement => NotificationKind::Announcement,
            engine::NotificationKind::Expense => NotificationKind::Expense,
            engine::NotificationKind::Deposit => NotificationKind::Deposit,
            engine::NotificationKind::Join => NotificationKind::Join,
        },
        group_id: notification.group_id,
        group_name: notification.group_name,
        message: notification.message,
        read: notification.read,
        created_at: notification.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<NotificationList>, ServerError> {
    let notifications = state.engine.notifications(&user.username).await?;
    let unread = notifications.iter().filter(|n| !n.read).count() as u64;

    Ok(Json(NotificationList {
        notifications: notifications.into_iter().map(notification_view).collect(),
        unread,
    }))
}

pub async fn mark_read(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.mark_read(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<MarkedRead>, ServerError> {
    let updated = state.engine.mark_all_read(&user.username).await?;
    Ok(Json(MarkedRead { updated }))
}
