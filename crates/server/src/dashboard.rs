//! Home screen: the group to show first, upcoming deposit deadlines, the
//! latest notices and the unread badge.

use api_types::dashboard::{Dashboard, DepositReminder, LatestNotice};
use axum::{Extension, Json, extract::State};
use engine::{User, top_priority_group};

use crate::{
    ServerError,
    groups::{group_view, today},
    server::ServerState,
};

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Dashboard>, ServerError> {
    let today = today();
    let engine = &state.engine;

    let groups = engine.member_groups(&user.username).await?;
    let top_group = top_priority_group(&groups, today)
        .cloned()
        .map(|group| group_view(group, &user.username, today));

    let reminders = engine
        .deposit_reminders(&user.username, today)
        .await?
        .into_iter()
        .map(|r| DepositReminder {
            group_id: r.group_id,
            group_name: r.group_name,
            due_date: r.due_date,
            days_left: r.days_left,
            fee_per_person: r.fee_per_person,
        })
        .collect();

    let latest_notices = engine
        .latest_notices(&user.username)
        .await?
        .into_iter()
        .map(|latest| LatestNotice {
            group_id: latest.notice.group_id,
            group_name: latest.group_name,
            title: latest.notice.title,
            author_nickname: latest.notice.author_nickname,
            created_at: latest.notice.created_at,
        })
        .collect();

    let unread_notifications = engine.unread_count(&user.username).await?;

    Ok(Json(Dashboard {
        top_group,
        reminders,
        latest_notices,
        unread_notifications,
    }))
}
