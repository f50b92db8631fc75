//! Participant slots: listing, inviting and joining.

use api_types::participant::{Invite, Invited, Join, JoinPreview, ParticipantList, ParticipantView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Participant, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn participant_view(participant: Participant) -> ParticipantView {
    ParticipantView {
        id: participant.id,
        nickname: participant.nickname,
        user_id: participant.user_id,
        is_owner: participant.is_owner,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParticipantList>, ServerError> {
    let participants = state.engine.participants(id, &user.username).await?;
    Ok(Json(ParticipantList {
        participants: participants.into_iter().map(participant_view).collect(),
    }))
}

pub async fn invite(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Invite>,
) -> Result<(StatusCode, Json<Invited>), ServerError> {
    let slot = state
        .engine
        .invite_participant(id, &user.username, &payload.nickname)
        .await?;
    Ok((StatusCode::CREATED, Json(Invited { id: slot })))
}

pub async fn join(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Join>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .join_group(id, &user.username, payload.participant_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Invite page: readable by any signed-in user holding the link.
pub async fn preview(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JoinPreview>, ServerError> {
    let preview = state.engine.join_preview(id).await?;
    Ok(Json(JoinPreview {
        group_id: preview.group_id,
        name: preview.name,
        description: preview.description,
        start_date: preview.start_date,
        end_date: preview.end_date,
        due_date: preview.due_date,
        total_budget: preview.total_budget,
        participants: preview
            .participants
            .into_iter()
            .map(participant_view)
            .collect(),
    }))
}
