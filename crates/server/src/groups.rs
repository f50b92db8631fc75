//! Group endpoints.

use api_types::group::{GroupCreated, GroupList, GroupNew, GroupStatus, GroupUpdate, GroupView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use engine::{CreateGroupCmd, Group, UpdateGroupCmd, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Calendar day used for status and deadline checks.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn group_view(group: Group, user_id: &str, today: NaiveDate) -> GroupView {
    let status = group.status(today);
    GroupView {
        fee_per_person: group.fee_per_person(),
        is_owner: group.is_owner(user_id),
        closed: status.is_closed(),
        status: match status {
            engine::GroupStatus::Recruiting => GroupStatus::Recruiting,
            engine::GroupStatus::InProgress => GroupStatus::InProgress,
            engine::GroupStatus::Finished => GroupStatus::Finished,
        },
        id: group.id,
        name: group.name,
        description: group.description,
        creator_id: group.creator_id,
        start_date: group.start_date,
        end_date: group.end_date,
        due_date: group.due_date,
        total_budget: group.total_budget,
        balance: group.balance,
        participant_count: group.participant_count,
    }
}

fn group_list(groups: Vec<Group>, user_id: &str) -> GroupList {
    let today = today();
    GroupList {
        groups: groups
            .into_iter()
            .map(|g| group_view(g, user_id, today))
            .collect(),
    }
}

pub async fn group_new(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupCreated>), ServerError> {
    let cmd = CreateGroupCmd::new(
        payload.name,
        &user.username,
        payload.start_date,
        payload.end_date,
        payload.due_date,
        payload.total_budget,
        today(),
    )
    .description(payload.description)
    .participants(payload.participants);
    let id = state.engine.create_group(cmd).await?;

    Ok((StatusCode::CREATED, Json(GroupCreated { id })))
}

pub async fn mine(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<GroupList>, ServerError> {
    let groups = state.engine.my_groups(&user.username).await?;
    Ok(Json(group_list(groups, &user.username)))
}

pub async fn joined(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<GroupList>, ServerError> {
    let groups = state.engine.joined_groups(&user.username).await?;
    Ok(Json(group_list(groups, &user.username)))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state.engine.group(id, &user.username).await?;
    Ok(Json(group_view(group, &user.username, today())))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GroupUpdate>,
) -> Result<Json<GroupView>, ServerError> {
    let current = state.engine.group(id, &user.username).await?;

    let mut cmd = UpdateGroupCmd::new();
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if payload.start_date.is_some() || payload.end_date.is_some() || payload.due_date.is_some() {
        cmd = cmd.dates(
            payload.start_date.unwrap_or(current.start_date),
            payload.end_date.unwrap_or(current.end_date),
            payload.due_date.unwrap_or(current.due_date),
        );
    }
    if let Some(total_budget) = payload.total_budget {
        cmd = cmd.total_budget(total_budget);
    }

    let group = state.engine.update_group(id, &user.username, cmd).await?;
    Ok(Json(group_view(group, &user.username, today())))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_group(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}
