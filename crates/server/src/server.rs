use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::{sync::Arc, time::Duration};

use crate::{
    dashboard, expenses, groups, notices, notifications, participants,
    pin::{self, PinSessions},
    statistics, user, wallets,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub pins: Arc<PinSessions>,
}

/// Listener and session settings, filled from the app settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub pin_session_ttl: Duration,
    /// How long PIN verification stays locked after too many wrong PINs.
    pub pin_lockout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            pin_session_ttl: Duration::from_secs(600),
            pin_lockout: Duration::from_secs(300),
        }
    }
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = match state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await
    {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!("rejected login for {}: {err}", auth_header.username());
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Build the full application router.
///
/// Every route except `POST /signup` sits behind HTTP Basic auth.
pub fn router(engine: Arc<Engine>, config: &ServerConfig) -> Router {
    let state = ServerState {
        engine,
        pins: Arc::new(PinSessions::new(config.pin_session_ttl, config.pin_lockout)),
    };

    let authenticated = Router::new()
        .route("/me", get(user::me).patch(user::change_nickname).delete(user::withdraw))
        .route("/me/password", axum::routing::put(user::change_password))
        .route("/me/account", get(user::account).put(user::set_account))
        .route("/me/pin", post(pin::register))
        .route("/me/pin/verify", post(pin::verify))
        .route("/dashboard", get(dashboard::get))
        .route("/groups", post(groups::group_new))
        .route("/groups/mine", get(groups::mine))
        .route("/groups/joined", get(groups::joined))
        .route(
            "/groups/{id}",
            get(groups::get).patch(groups::update).delete(groups::delete),
        )
        .route("/groups/{id}/preview", get(participants::preview))
        .route(
            "/groups/{id}/participants",
            get(participants::list).post(participants::invite),
        )
        .route("/groups/{id}/join", post(participants::join))
        .route("/groups/{id}/wallet", get(wallets::get))
        .route("/groups/{id}/deposit", post(wallets::deposit))
        .route("/groups/{id}/paid", get(wallets::paid))
        .route(
            "/groups/{id}/expenses",
            get(expenses::list).post(expenses::expense_new),
        )
        .route("/groups/{id}/expenses/{eid}", patch(expenses::update))
        .route("/groups/{id}/expenses/delete", post(expenses::delete))
        .route(
            "/groups/{id}/notices",
            get(notices::list).post(notices::notice_new),
        )
        .route("/groups/{id}/notices/{nid}", patch(notices::update))
        .route("/groups/{id}/notices/delete", post(notices::delete))
        .route("/groups/{id}/stats/monthly", get(statistics::monthly))
        .route("/groups/{id}/stats/daily", get(statistics::daily))
        .route("/groups/{id}/stats/trend", get(statistics::trend))
        .route("/notifications", get(notifications::list))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/signup", post(user::signup))
        .merge(authenticated)
        .with_state(state)
}

pub async fn run(engine: Engine, config: ServerConfig) {
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, config, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine), &config)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
