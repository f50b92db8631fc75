//! Notice board endpoints.

use api_types::{
    ListQuery,
    notice::{NoticeCreated, NoticeDelete, NoticeList, NoticeNew, NoticeView, NoticesDeleted},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Notice, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn notice_view(notice: Notice) -> NoticeView {
    NoticeView {
        id: notice.id,
        title: notice.title,
        content: notice.content,
        author: notice.author,
        author_nickname: notice.author_nickname,
        created_at: notice.created_at,
    }
}

pub async fn notice_new(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NoticeNew>,
) -> Result<(StatusCode, Json<NoticeCreated>), ServerError> {
    let notice_id = state
        .engine
        .add_notice(id, &user.username, &payload.title, &payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(NoticeCreated { id: notice_id })))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<NoticeList>, ServerError> {
    let notices = state.engine.notices(id, &user.username, query.limit).await?;
    Ok(Json(NoticeList {
        notices: notices.into_iter().map(notice_view).collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path((id, notice_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<NoticeNew>,
) -> Result<Json<NoticeView>, ServerError> {
    let notice = state
        .engine
        .update_notice(id, notice_id, &user.username, &payload.title, &payload.content)
        .await?;
    Ok(Json(notice_view(notice)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NoticeDelete>,
) -> Result<Json<NoticesDeleted>, ServerError> {
    let deleted = state
        .engine
        .delete_notices(id, &user.username, &payload.ids)
        .await?;
    Ok(Json(NoticesDeleted { deleted }))
}
