//! Sign-up, profile and bank account endpoints.

use api_types::user::{Account, AccountResponse, NicknameUpdate, PasswordUpdate, Profile, SignUp};
use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::TypedHeader;
use engine::{AccountCmd, RegisterUserCmd, User};

use crate::{
    ServerError,
    pin::{PinTokenHeader, require_pin},
    server::ServerState,
};

pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<SignUp>,
) -> Result<(StatusCode, Json<Profile>), ServerError> {
    let username = state
        .engine
        .register_user(RegisterUserCmd::new(
            &payload.username,
            &payload.password,
            &payload.nickname,
            &payload.email,
        ))
        .await?;
    tracing::info!("new user {username}");
    let user = state.engine.user(&username).await?;

    Ok((StatusCode::CREATED, Json(profile(user))))
}

pub async fn me(
    Extension(user): Extension<User>,
) -> Result<Json<Profile>, ServerError> {
    Ok(Json(profile(user)))
}

pub async fn change_nickname(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<NicknameUpdate>,
) -> Result<Json<Profile>, ServerError> {
    state
        .engine
        .change_nickname(&user.username, &payload.nickname)
        .await?;
    let user = state.engine.user(&user.username).await?;
    Ok(Json(profile(user)))
}

pub async fn change_password(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<PasswordUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .change_password(&user.username, &payload.current, &payload.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn withdraw(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    pin_header: Option<TypedHeader<PinTokenHeader>>,
) -> Result<StatusCode, ServerError> {
    require_pin(&state, pin_header, &user).await?;
    state.engine.withdraw_user(&user.username).await?;
    state.pins.close_all(&user.username).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn account(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<AccountResponse>, ServerError> {
    let account = state.engine.account(&user.username).await?;
    Ok(Json(AccountResponse {
        account: account.map(account_view),
    }))
}

pub async fn set_account(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    pin_header: Option<TypedHeader<PinTokenHeader>>,
    Json(payload): Json<Account>,
) -> Result<Json<AccountResponse>, ServerError> {
    require_pin(&state, pin_header, &user).await?;
    state
        .engine
        .set_account(
            &user.username,
            AccountCmd::new(&payload.bank, &payload.number, payload.balance),
        )
        .await?;
    let account = state.engine.account(&user.username).await?;
    Ok(Json(AccountResponse {
        account: account.map(account_view),
    }))
}

fn account_view(account: engine::Account) -> Account {
    Account {
        bank: account.bank,
        number: account.number,
        balance: account.balance,
    }
}

fn profile(user: User) -> Profile {
    Profile {
        has_account: user.account.is_some(),
        username: user.username,
        nickname: user.nickname,
        email: user.email,
        has_pin: user.has_pin,
        created_at: user.created_at,
    }
}
