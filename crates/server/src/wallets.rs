//! Wallets API endpoints.

use api_types::wallet::{DepositCreated, DepositNew, PaidList, WalletView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{DepositCmd, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.wallet(id, &user.username).await?;
    Ok(Json(WalletView {
        group_id: wallet.group_id,
        user_id: wallet.user_id,
        balance: wallet.balance,
        paid: wallet.paid,
        updated_at: wallet.updated_at,
    }))
}

pub async fn deposit(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DepositNew>,
) -> Result<(StatusCode, Json<DepositCreated>), ServerError> {
    let mut cmd = DepositCmd::new(id, &user.username, payload.amount);
    if let Some(key) = payload.idempotency_key {
        cmd = cmd.idempotency_key(key);
    }
    let deposit_id = state.engine.deposit(cmd).await?;

    Ok((StatusCode::CREATED, Json(DepositCreated { id: deposit_id })))
}

pub async fn paid(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaidList>, ServerError> {
    let paid = state.engine.paid_participants(id, &user.username).await?;
    Ok(Json(PaidList { paid }))
}
